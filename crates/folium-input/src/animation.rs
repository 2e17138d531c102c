//! Easing functions and tweens for control fades and knob recentring.

use folium_types::geometry::Point;

/// Standard easing functions.
///
/// Input `t` is clamped to `[0.0, 1.0]`. Output is the eased value.
pub mod easing {
    /// Linear easing (no acceleration).
    pub fn linear(t: f64) -> f64 {
        t.clamp(0.0, 1.0)
    }

    /// Quadratic ease-in-out (slow start and end).
    pub fn ease_in_out_quad(t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t < 0.5 {
            2.0 * t * t
        } else {
            -1.0 + (4.0 - 2.0 * t) * t
        }
    }

    /// Cubic ease-out (slow end, sharper than quad).
    pub fn ease_out_cubic(t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let t1 = t - 1.0;
        t1 * t1 * t1 + 1.0
    }
}

/// A running animation that interpolates between two values.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    pub start: f64,
    pub end: f64,
    pub duration_ms: u32,
    pub elapsed_ms: u32,
    pub easing: fn(f64) -> f64,
}

impl Tween {
    pub fn new(start: f64, end: f64, duration_ms: u32, easing: fn(f64) -> f64) -> Self {
        Self {
            start,
            end,
            duration_ms,
            elapsed_ms: 0,
            easing,
        }
    }

    /// A tween that has already arrived at `value`.
    pub fn settled(value: f64) -> Self {
        Self::new(value, value, 0, easing::linear)
    }

    /// Advance by `dt_ms` and return the current interpolated value.
    pub fn tick(&mut self, dt_ms: u32) -> f64 {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms).min(self.duration_ms);
        self.value()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Current value without advancing time.
    pub fn value(&self) -> f64 {
        let t = if self.duration_ms > 0 {
            self.elapsed_ms as f64 / self.duration_ms as f64
        } else {
            1.0
        };
        self.start + (self.end - self.start) * (self.easing)(t)
    }

    /// Restart towards `end` from wherever the tween currently is.
    pub fn retarget(&mut self, end: f64, duration_ms: u32) {
        *self = Self::new(self.value(), end, duration_ms, self.easing);
    }
}

/// Tween a point (used for the thumbstick knob).
#[derive(Debug, Clone, Copy)]
pub struct PointTween {
    pub start: Point,
    pub end: Point,
    tween: Tween,
}

impl PointTween {
    pub fn new(start: Point, end: Point, duration_ms: u32, easing: fn(f64) -> f64) -> Self {
        Self {
            start,
            end,
            tween: Tween::new(0.0, 1.0, duration_ms, easing),
        }
    }

    pub fn tick(&mut self, dt_ms: u32) -> Point {
        self.tween.tick(dt_ms);
        self.value()
    }

    pub fn value(&self) -> Point {
        let t = self.tween.value();
        Point::new(
            self.start.x + (self.end.x - self.start.x) * t,
            self.start.y + (self.end.y - self.start.y) * t,
        )
    }

    pub fn is_finished(&self) -> bool {
        self.tween.is_finished()
    }
}
