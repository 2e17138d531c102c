//! The live touch surface.
//!
//! One element per button and thumbstick of a [`ResolvedLayout`]. Touches
//! are hit-tested against element frames, each touch is owned by the
//! element it started on, and the surface emits normalized
//! [`InputEvent`]s. Everything here runs on the main thread.

use folium_skin::{RenderDescriptor, ResolvedLayout};
use folium_types::geometry::{Point, Rect};
use folium_types::input::{InputEvent, LogicalButton, ThumbstickKind, Vector2};

use crate::animation::{PointTween, Tween, easing};

/// Host-assigned identifier of one finger.
pub type TouchId = u64;

/// Fraction of the stick's half-size the knob may travel.
pub const MAX_DRAG_FRACTION: f64 = 0.9;

/// Time for the knob to spring back to centre after release.
const KNOB_RETURN_MS: u32 = 150;

/// Default control fade when a gamepad connects or disconnects.
pub const DEFAULT_FADE_MS: u32 = 200;

/// Something that can produce a short vibration.
pub trait Haptics {
    fn pulse(&mut self);
}

/// Haptics sink for hosts without a vibration motor, or with haptics off.
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn pulse(&mut self) {}
}

/// The host's `motor` when haptics are enabled, otherwise [`NoHaptics`].
pub fn haptics_sink<H: Haptics + 'static>(enabled: bool, motor: H) -> Box<dyn Haptics> {
    if enabled {
        Box::new(motor)
    } else {
        log::debug!("Haptics disabled");
        Box::new(NoHaptics)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Pressed,
    /// The owning touch slid off the button without lifting.
    DraggedOut,
}

#[derive(Debug, Clone, Copy)]
struct LongPress {
    min_ms: u32,
    held_ms: u32,
    fired: bool,
}

/// An interactive on-screen button.
#[derive(Debug)]
pub struct ButtonElement {
    pub kind: LogicalButton,
    pub frame: Rect,
    pub base_alpha: f64,
    pub vibrate_on_tap: bool,
    pub render: RenderDescriptor,
    state: ButtonState,
    touch: Option<TouchId>,
    long_press: Option<LongPress>,
}

impl ButtonElement {
    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn is_pressed(&self) -> bool {
        self.state == ButtonState::Pressed
    }

    pub fn has_long_press(&self) -> bool {
        self.long_press.is_some()
    }
}

/// An interactive on-screen analog stick.
#[derive(Debug)]
pub struct ThumbstickElement {
    pub kind: ThumbstickKind,
    pub frame: Rect,
    pub base_alpha: f64,
    pub vibrate_on_tap: bool,
    pub render: RenderDescriptor,
    touch: Option<TouchId>,
    vector: Vector2,
    /// Knob offset from the stick centre, in points.
    knob: Point,
    knob_return: Option<PointTween>,
}

impl ThumbstickElement {
    pub fn vector(&self) -> Vector2 {
        self.vector
    }

    pub fn knob_offset(&self) -> Point {
        self.knob
    }

    pub fn is_active(&self) -> bool {
        self.touch.is_some()
    }

    /// Deflection for a touch at `point` (screen space), and the matching
    /// knob offset.
    pub fn deflection(&self, point: Point) -> (Vector2, Point) {
        let local = self.frame.to_local(point);
        let radius = self.frame.width.min(self.frame.height) / 2.0;
        if radius <= 0.0 {
            return (Vector2::ZERO, Point::default());
        }
        let mut dx = local.x - self.frame.width / 2.0;
        let mut dy = local.y - self.frame.height / 2.0;
        let max = radius * MAX_DRAG_FRACTION;
        let distance = dx.hypot(dy);
        if distance > max {
            dx *= max / distance;
            dy *= max / distance;
        }
        (Vector2::new(dx / radius, -dy / radius), Point::new(dx, dy))
    }
}

/// The set of interactive controls for the current layout.
pub struct InputSurface {
    buttons: Vec<ButtonElement>,
    thumbsticks: Vec<ThumbstickElement>,
    haptics: Box<dyn Haptics>,
    fade: Tween,
    fade_ms: u32,
    interactive: bool,
    controller_connected: bool,
}

impl InputSurface {
    pub fn new(layout: &ResolvedLayout, haptics: Box<dyn Haptics>, fade_ms: u32) -> Self {
        let mut surface = Self {
            buttons: Vec::new(),
            thumbsticks: Vec::new(),
            haptics,
            fade: Tween::new(1.0, 1.0, 0, easing::ease_in_out_quad),
            fade_ms,
            interactive: true,
            controller_connected: false,
        };
        surface.set_layout(layout);
        surface
    }

    /// Replace all elements with those of `layout`.
    ///
    /// Anything held down is released first; the returned events say so.
    /// Long-press attachments do not carry over.
    pub fn set_layout(&mut self, layout: &ResolvedLayout) -> Vec<InputEvent> {
        let released = self.release_all();
        self.buttons = layout
            .buttons
            .iter()
            .map(|b| ButtonElement {
                kind: b.kind,
                frame: b.frame,
                base_alpha: b.alpha,
                vibrate_on_tap: b.vibrate_on_tap,
                render: b.render.clone(),
                state: ButtonState::Idle,
                touch: None,
                long_press: None,
            })
            .collect();
        self.thumbsticks = layout
            .thumbsticks
            .iter()
            .map(|t| ThumbstickElement {
                kind: t.kind,
                frame: t.frame,
                base_alpha: t.alpha,
                vibrate_on_tap: t.vibrate_on_tap,
                render: t.render.clone(),
                touch: None,
                vector: Vector2::ZERO,
                knob: Point::default(),
                knob_return: None,
            })
            .collect();
        log::debug!(
            "Input surface: {} buttons, {} thumbsticks",
            self.buttons.len(),
            self.thumbsticks.len()
        );
        released
    }

    pub fn buttons(&self) -> &[ButtonElement] {
        &self.buttons
    }

    pub fn thumbsticks(&self) -> &[ThumbstickElement] {
        &self.thumbsticks
    }

    /// Look up the element for a logical button.
    pub fn button(&self, kind: LogicalButton) -> Option<&ButtonElement> {
        self.buttons.iter().find(|b| b.kind == kind)
    }

    pub fn button_mut(&mut self, kind: LogicalButton) -> Option<&mut ButtonElement> {
        self.buttons.iter_mut().find(|b| b.kind == kind)
    }

    pub fn thumbstick(&self, kind: ThumbstickKind) -> Option<&ThumbstickElement> {
        self.thumbsticks.iter().find(|t| t.kind == kind)
    }

    /// Make holding `kind` for `min_ms` report a long press from [`tick`].
    ///
    /// Returns `false` when the layout has no such button.
    ///
    /// [`tick`]: Self::tick
    pub fn attach_long_press(&mut self, kind: LogicalButton, min_ms: u32) -> bool {
        match self.button_mut(kind) {
            Some(b) => {
                b.long_press = Some(LongPress {
                    min_ms,
                    held_ms: 0,
                    fired: false,
                });
                true
            },
            None => false,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Current surface-wide opacity multiplier.
    pub fn alpha(&self) -> f64 {
        self.fade.value()
    }

    /// Effective opacity of a button including the controller fade.
    pub fn button_alpha(&self, element: &ButtonElement) -> f64 {
        element.base_alpha * self.alpha()
    }

    pub fn touch_began(&mut self, id: TouchId, point: Point) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if !self.interactive || self.owns(id) {
            return events;
        }

        if let Some(stick) = self
            .thumbsticks
            .iter_mut()
            .rev()
            .find(|t| t.touch.is_none() && t.frame.contains(point))
        {
            stick.touch = Some(id);
            stick.knob_return = None;
            if stick.vibrate_on_tap {
                self.haptics.pulse();
            }
            events.push(move_stick(stick, point));
            return events;
        }

        // Later buttons draw on top, so they win overlapping hits.
        if let Some(button) = self
            .buttons
            .iter_mut()
            .rev()
            .find(|b| b.touch.is_none() && b.frame.contains(point))
        {
            button.touch = Some(id);
            if button.vibrate_on_tap {
                self.haptics.pulse();
            }
            button.state = ButtonState::Pressed;
            events.push(InputEvent::ButtonDown(button.kind));
        }
        events
    }

    pub fn touch_moved(&mut self, id: TouchId, point: Point) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if let Some(stick) = self.thumbsticks.iter_mut().find(|t| t.touch == Some(id)) {
            events.push(move_stick(stick, point));
        } else if let Some(button) = self.buttons.iter_mut().find(|b| b.touch == Some(id)) {
            let inside = button.frame.contains(point);
            match (button.state, inside) {
                (ButtonState::Pressed, false) => {
                    button.state = ButtonState::DraggedOut;
                    if let Some(lp) = button.long_press.as_mut() {
                        lp.held_ms = 0;
                    }
                    events.push(InputEvent::ButtonUp(button.kind));
                },
                // Re-entering is not a new press: no haptic pulse.
                (ButtonState::DraggedOut, true) => {
                    button.state = ButtonState::Pressed;
                    events.push(InputEvent::ButtonDown(button.kind));
                },
                _ => {},
            }
        }
        events
    }

    pub fn touch_ended(&mut self, id: TouchId, _point: Point) -> Vec<InputEvent> {
        self.release_touch(id)
    }

    pub fn touch_cancelled(&mut self, id: TouchId) -> Vec<InputEvent> {
        self.release_touch(id)
    }

    /// A physical gamepad connected: fade controls out and stop taking
    /// touches. Held controls are released.
    pub fn controller_connected(&mut self) -> Vec<InputEvent> {
        if self.controller_connected {
            return Vec::new();
        }
        self.controller_connected = true;
        self.interactive = false;
        self.fade.retarget(0.0, self.fade_ms);
        log::info!("Gamepad connected -- hiding on-screen controls");
        self.release_all()
    }

    /// The gamepad went away: fade controls back in.
    pub fn controller_disconnected(&mut self) {
        if !self.controller_connected {
            return;
        }
        self.controller_connected = false;
        self.interactive = true;
        self.fade.retarget(1.0, self.fade_ms);
        log::info!("Gamepad disconnected -- showing on-screen controls");
    }

    /// Advance animations and hold timers by `dt_ms`.
    ///
    /// Returns the buttons whose long press completed during this tick.
    pub fn tick(&mut self, dt_ms: u32) -> Vec<LogicalButton> {
        self.fade.tick(dt_ms);

        for stick in &mut self.thumbsticks {
            if let Some(tween) = stick.knob_return.as_mut() {
                stick.knob = tween.tick(dt_ms);
                if tween.is_finished() {
                    stick.knob_return = None;
                }
            }
        }

        let mut long_pressed = Vec::new();
        for button in &mut self.buttons {
            let pressed = button.state == ButtonState::Pressed;
            if let Some(lp) = button.long_press.as_mut()
                && pressed
                && !lp.fired
            {
                lp.held_ms = lp.held_ms.saturating_add(dt_ms);
                if lp.held_ms >= lp.min_ms {
                    lp.fired = true;
                    long_pressed.push(button.kind);
                }
            }
        }
        long_pressed
    }

    fn owns(&self, id: TouchId) -> bool {
        self.buttons.iter().any(|b| b.touch == Some(id))
            || self.thumbsticks.iter().any(|t| t.touch == Some(id))
    }

    fn release_touch(&mut self, id: TouchId) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if let Some(stick) = self.thumbsticks.iter_mut().find(|t| t.touch == Some(id)) {
            events.push(release_stick(stick));
        } else if let Some(button) = self.buttons.iter_mut().find(|b| b.touch == Some(id)) {
            if let Some(e) = release_button(button) {
                events.push(e);
            }
        }
        events
    }

    fn release_all(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for stick in self.thumbsticks.iter_mut().filter(|t| t.touch.is_some()) {
            events.push(release_stick(stick));
        }
        for button in &mut self.buttons {
            if let Some(e) = release_button(button) {
                events.push(e);
            }
        }
        events
    }
}

fn move_stick(stick: &mut ThumbstickElement, point: Point) -> InputEvent {
    let (vector, knob) = stick.deflection(point);
    stick.vector = vector;
    stick.knob = knob;
    InputEvent::ThumbstickMoved(stick.kind, vector)
}

fn release_stick(stick: &mut ThumbstickElement) -> InputEvent {
    stick.touch = None;
    stick.vector = Vector2::ZERO;
    stick.knob_return = Some(PointTween::new(
        stick.knob,
        Point::default(),
        KNOB_RETURN_MS,
        easing::ease_out_cubic,
    ));
    InputEvent::ThumbstickEnded(stick.kind, Vector2::ZERO)
}

fn release_button(button: &mut ButtonElement) -> Option<InputEvent> {
    let was_pressed = button.state == ButtonState::Pressed;
    button.touch = None;
    button.state = ButtonState::Idle;
    if let Some(lp) = button.long_press.as_mut() {
        lp.held_ms = 0;
        lp.fired = false;
    }
    was_pressed.then_some(InputEvent::ButtonUp(button.kind))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use folium_skin::{ControlStyle, LayoutSource, ResolvedButton, ResolvedThumbstick};
    use folium_types::geometry::{Insets, Orientation, Size, Viewport};
    use folium_types::CoreId;
    use proptest::prelude::*;

    use super::*;

    struct CountingHaptics(Rc<Cell<u32>>);

    impl Haptics for CountingHaptics {
        fn pulse(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn button(kind: LogicalButton, frame: Rect, vibrate: bool) -> ResolvedButton {
        ResolvedButton {
            kind,
            frame,
            alpha: 0.8,
            vibrate_on_tap: vibrate,
            render: RenderDescriptor::new(ControlStyle::Default, None, frame),
        }
    }

    fn layout() -> ResolvedLayout {
        let stick = Rect::new(0.0, 400.0, 100.0, 100.0);
        ResolvedLayout {
            core: CoreId::Cytrus,
            orientation: Orientation::Portrait,
            viewport: Viewport::new(Size::new(390.0, 844.0), Insets::ZERO),
            buttons: vec![
                button(LogicalButton::A, Rect::new(300.0, 600.0, 50.0, 50.0), true),
                button(LogicalButton::B, Rect::new(240.0, 600.0, 50.0, 50.0), false),
                button(LogicalButton::Settings, Rect::new(170.0, 780.0, 50.0, 30.0), false),
            ],
            thumbsticks: vec![ResolvedThumbstick {
                kind: ThumbstickKind::Left,
                frame: stick,
                alpha: 1.0,
                vibrate_on_tap: false,
                render: RenderDescriptor::new(ControlStyle::Default, None, stick),
            }],
            screens: vec![Rect::new(0.0, 0.0, 390.0, 300.0)],
            background: None,
            debug_outlines: false,
            source: LayoutSource::Generated,
        }
    }

    fn surface() -> (InputSurface, Rc<Cell<u32>>) {
        let pulses = Rc::new(Cell::new(0));
        let haptics = Box::new(CountingHaptics(Rc::clone(&pulses)));
        let s = InputSurface::new(&layout(), haptics, DEFAULT_FADE_MS);
        (s, pulses)
    }

    const A_CENTER: Point = Point::new(325.0, 625.0);

    #[test]
    fn press_and_release_emits_down_up() {
        let (mut s, pulses) = surface();
        assert_eq!(s.touch_began(1, A_CENTER), vec![InputEvent::ButtonDown(LogicalButton::A)]);
        assert!(s.button(LogicalButton::A).unwrap().is_pressed());
        assert_eq!(s.touch_ended(1, A_CENTER), vec![InputEvent::ButtonUp(LogicalButton::A)]);
        assert_eq!(s.button(LogicalButton::A).unwrap().state(), ButtonState::Idle);
        assert_eq!(pulses.get(), 1);
    }

    #[test]
    fn miss_emits_nothing() {
        let (mut s, _) = surface();
        assert!(s.touch_began(1, Point::new(5.0, 5.0)).is_empty());
        assert!(s.touch_ended(1, Point::new(5.0, 5.0)).is_empty());
    }

    #[test]
    fn haptic_fires_once_per_unbroken_press() {
        let (mut s, pulses) = surface();
        s.touch_began(1, A_CENTER);
        for i in 0..30 {
            s.touch_moved(1, Point::new(A_CENTER.x + (i % 3) as f64, A_CENTER.y));
            s.tick(16);
        }
        // Drag off and back on: still the same press.
        assert_eq!(
            s.touch_moved(1, Point::new(10.0, 10.0)),
            vec![InputEvent::ButtonUp(LogicalButton::A)]
        );
        assert_eq!(s.button(LogicalButton::A).unwrap().state(), ButtonState::DraggedOut);
        assert_eq!(s.touch_moved(1, A_CENTER), vec![InputEvent::ButtonDown(LogicalButton::A)]);
        s.touch_ended(1, A_CENTER);
        assert_eq!(pulses.get(), 1);

        s.touch_began(2, A_CENTER);
        assert_eq!(pulses.get(), 2);
    }

    #[test]
    fn no_haptic_without_vibrate_flag() {
        let (mut s, pulses) = surface();
        s.touch_began(1, Point::new(260.0, 620.0));
        assert_eq!(pulses.get(), 0);
    }

    #[test]
    fn release_while_dragged_out_emits_nothing_more() {
        let (mut s, _) = surface();
        s.touch_began(1, A_CENTER);
        s.touch_moved(1, Point::new(0.0, 0.0));
        assert!(s.touch_ended(1, Point::new(0.0, 0.0)).is_empty());
    }

    #[test]
    fn cancel_releases_button() {
        let (mut s, _) = surface();
        s.touch_began(7, A_CENTER);
        assert_eq!(s.touch_cancelled(7), vec![InputEvent::ButtonUp(LogicalButton::A)]);
    }

    #[test]
    fn two_fingers_press_two_buttons() {
        let (mut s, _) = surface();
        s.touch_began(1, A_CENTER);
        s.touch_began(2, Point::new(260.0, 620.0));
        assert!(s.button(LogicalButton::A).unwrap().is_pressed());
        assert!(s.button(LogicalButton::B).unwrap().is_pressed());
        // Second finger on an already-held button is ignored.
        assert!(s.touch_began(3, A_CENTER).is_empty());
        assert_eq!(
            s.touch_ended(2, Point::default()),
            vec![InputEvent::ButtonUp(LogicalButton::B)]
        );
        assert!(s.button(LogicalButton::A).unwrap().is_pressed());
    }

    #[test]
    fn thumbstick_up_is_positive_y() {
        let (mut s, _) = surface();
        // Stick centre is (50, 450); touch 20pt above it.
        let events = s.touch_began(1, Point::new(50.0, 430.0));
        match events[0] {
            InputEvent::ThumbstickMoved(ThumbstickKind::Left, v) => {
                assert!(v.x.abs() < 1e-12);
                assert!((v.y - 0.4).abs() < 1e-12);
            },
            ref other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn thumbstick_clamps_to_drag_radius() {
        let (mut s, _) = surface();
        s.touch_began(1, Point::new(50.0, 450.0));
        let events = s.touch_moved(1, Point::new(500.0, 450.0));
        let InputEvent::ThumbstickMoved(_, v) = events[0] else {
            panic!("expected stick move");
        };
        assert!((v.x - MAX_DRAG_FRACTION).abs() < 1e-12);
        assert!((s.thumbstick(ThumbstickKind::Left).unwrap().knob_offset().x - 45.0).abs() < 1e-9);
    }

    #[test]
    fn thumbstick_release_zeroes_and_recentres() {
        let (mut s, _) = surface();
        s.touch_began(1, Point::new(90.0, 450.0));
        let events = s.touch_ended(1, Point::new(90.0, 450.0));
        assert_eq!(events, vec![InputEvent::ThumbstickEnded(ThumbstickKind::Left, Vector2::ZERO)]);
        let stick = s.thumbstick(ThumbstickKind::Left).unwrap();
        assert_eq!(stick.vector(), Vector2::ZERO);
        assert!(stick.knob_offset().x > 0.0);
        s.tick(KNOB_RETURN_MS);
        assert_eq!(s.thumbstick(ThumbstickKind::Left).unwrap().knob_offset(), Point::default());
    }

    #[test]
    fn controller_connect_fades_out_and_blocks_touches() {
        let (mut s, _) = surface();
        s.touch_began(1, A_CENTER);
        let released = s.controller_connected();
        assert_eq!(released, vec![InputEvent::ButtonUp(LogicalButton::A)]);
        assert!(!s.is_interactive());
        assert!(s.touch_began(2, A_CENTER).is_empty());

        s.tick(100);
        let mid = s.alpha();
        assert!(mid > 0.0 && mid < 1.0, "{mid}");
        s.tick(100);
        assert_eq!(s.alpha(), 0.0);
        let a = s.button(LogicalButton::A).unwrap();
        assert_eq!(s.button_alpha(a), 0.0);

        // Repeated notifications are harmless.
        assert!(s.controller_connected().is_empty());

        s.controller_disconnected();
        assert!(s.is_interactive());
        s.tick(200);
        assert_eq!(s.alpha(), 1.0);
        let a = s.button(LogicalButton::A).unwrap();
        assert!((s.button_alpha(a) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn controller_fade_eases_in_and_out() {
        let (mut s, _) = surface();
        s.controller_connected();
        s.tick(50);
        assert!((s.alpha() - 0.875).abs() < 1e-12, "{}", s.alpha());
        s.tick(50);
        assert!((s.alpha() - 0.5).abs() < 1e-12, "{}", s.alpha());
        s.tick(100);
        assert_eq!(s.alpha(), 0.0);
    }

    #[test]
    fn disabled_haptics_never_pulse() {
        for (enabled, expected) in [(true, 1), (false, 0)] {
            let pulses = Rc::new(Cell::new(0));
            let haptics = haptics_sink(enabled, CountingHaptics(Rc::clone(&pulses)));
            let mut s = InputSurface::new(&layout(), haptics, DEFAULT_FADE_MS);
            s.touch_began(1, A_CENTER);
            s.touch_ended(1, A_CENTER);
            assert_eq!(pulses.get(), expected, "haptics enabled: {enabled}");
        }
    }

    #[test]
    fn long_press_fires_once_per_hold() {
        let (mut s, _) = surface();
        assert!(s.attach_long_press(LogicalButton::Settings, 500));
        assert!(!s.attach_long_press(LogicalButton::Home, 500));
        assert!(s.button(LogicalButton::Settings).unwrap().has_long_press());

        let p = Point::new(190.0, 790.0);
        s.touch_began(1, p);
        assert!(s.tick(300).is_empty());
        assert_eq!(s.tick(300), vec![LogicalButton::Settings]);
        assert!(s.tick(1000).is_empty());
        s.touch_ended(1, p);

        s.touch_began(2, p);
        assert_eq!(s.tick(600), vec![LogicalButton::Settings]);
    }

    #[test]
    fn set_layout_releases_held_controls() {
        let (mut s, _) = surface();
        s.touch_began(1, A_CENTER);
        s.touch_began(2, Point::new(50.0, 450.0));
        let events = s.set_layout(&layout());
        assert_eq!(events.len(), 2);
        assert!(s.button(LogicalButton::A).unwrap().state() == ButtonState::Idle);
    }

    proptest! {
        #[test]
        fn stick_vector_never_exceeds_unit(x in -500.0f64..600.0, y in 0.0f64..900.0) {
            let (mut s, _) = surface();
            s.touch_began(1, Point::new(50.0, 450.0));
            for e in s.touch_moved(1, Point::new(x, y)) {
                if let InputEvent::ThumbstickMoved(_, v) = e {
                    prop_assert!(v.magnitude() <= 1.0 + 1e-12);
                }
            }
        }

        #[test]
        fn stick_y_sign_is_inverted(dy in 1.0f64..40.0) {
            let (mut s, _) = surface();
            let events = s.touch_began(1, Point::new(50.0, 450.0 - dy));
            let InputEvent::ThumbstickMoved(_, v) = events[0] else {
                panic!("expected stick move");
            };
            prop_assert!(v.y > 0.0);
        }
    }
}
