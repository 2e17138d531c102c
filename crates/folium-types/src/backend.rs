//! The interface every external emulation core is driven through.
//!
//! Cores are closed-box engines. Folium only boots them, steps them, reads
//! their buffers and pokes their native input constants. Each core numbers
//! its buttons differently, so input crosses this boundary as raw native
//! codes produced by the input router.

use std::fmt;
use std::path::Path;

use crate::core_id::CoreId;
use crate::error::Result;
use crate::geometry::Point;

/// A core-specific button constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeButton(pub u32);

/// A core-specific analog stick constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeStick(pub u32);

impl fmt::Display for NativeButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "button#{}", self.0)
    }
}

/// Static facts about a core's capabilities and timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreCapabilities {
    /// Whether `save_state` / `load_state` are meaningful.
    pub save_states: bool,
    /// Whether the core accepts stylus input on a touch screen.
    pub touch_screen: bool,
    /// Emulated frames per second.
    pub frame_rate: f64,
    /// Audio output rate in Hz (0 when the core is silent).
    pub audio_sample_rate: u32,
}

impl Default for CoreCapabilities {
    fn default() -> Self {
        Self {
            save_states: false,
            touch_screen: false,
            frame_rate: 60.0,
            audio_sample_rate: 48_000,
        }
    }
}

impl CoreCapabilities {
    /// Audio samples one emulated frame is expected to produce.
    pub fn samples_per_tick(&self) -> usize {
        if self.frame_rate <= 0.0 {
            return 0;
        }
        (self.audio_sample_rate as f64 / self.frame_rate).round() as usize
    }
}

/// A hosted emulation core.
///
/// `step` runs on the session's worker thread; everything else may be
/// called from the main thread while the worker is parked on the session
/// lock.
pub trait EmulationCore: Send {
    fn id(&self) -> CoreId;

    fn capabilities(&self) -> CoreCapabilities {
        CoreCapabilities::default()
    }

    /// Load a game image and start the machine.
    fn insert_cartridge_and_boot(&mut self, path: &Path) -> Result<()>;

    /// Advance one frame.
    fn step(&mut self) -> Result<()>;

    /// Raw pixels of the most recent frame, in the core's native format.
    fn video_buffer(&self) -> &[u8];

    /// Valid `(width, height)` of the canvas for the current video mode,
    /// when the core renders into a larger fixed canvas.
    fn display_region(&self) -> Option<(u32, u32)> {
        None
    }

    /// Palette for cores whose video buffer holds 8-bit colour indices.
    fn palette(&self) -> Option<&[[u8; 3]]> {
        None
    }

    /// Audio samples produced by the most recent `step`.
    fn audio_buffer(&self) -> &[i16];

    fn button_down(&mut self, button: NativeButton);

    fn button_up(&mut self, button: NativeButton);

    /// Stick deflection in `[-1, 1]` per axis, `y` positive upwards.
    fn thumbstick_moved(&mut self, stick: NativeStick, x: f32, y: f32);

    fn touch_began(&mut self, _point: Point) {}

    fn touch_moved(&mut self, _point: Point) {}

    fn touch_ended(&mut self) {}

    fn save_state(&mut self) -> Result<()>;

    fn load_state(&mut self) -> Result<()>;

    /// Release emulation resources. Called once, after the worker has joined.
    fn stop(&mut self);
}
