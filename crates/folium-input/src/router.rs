//! Logical-to-native input routing.
//!
//! Every core numbers its buttons its own way. The router owns one lookup
//! table keyed by `(core, logical button)` built at construction, and
//! forwards surface events to the running core. Combinations a core has no
//! use for are dropped without calling into the core.

use std::collections::HashMap;

use folium_types::backend::{EmulationCore, NativeButton, NativeStick};
use folium_types::input::{InputEvent, LogicalButton, ThumbstickKind, Vector2};
use folium_types::CoreId;

/// Native buttons of the Cytrus core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CytrusButton {
    A = 0,
    B = 1,
    X = 2,
    Y = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
    L = 8,
    R = 9,
    Start = 10,
    Select = 11,
    Zl = 14,
    Zr = 15,
    Home = 16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CytrusStick {
    CirclePad = 0,
    CStick = 1,
}

/// Native buttons of the Grape core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum GrapeButton {
    A = 0,
    B = 1,
    Select = 2,
    Start = 3,
    Right = 4,
    Left = 5,
    Up = 6,
    Down = 7,
    R = 8,
    L = 9,
    X = 10,
    Y = 11,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum KiwiButton {
    Right = 0,
    Left = 1,
    Up = 2,
    Down = 3,
    A = 4,
    B = 5,
    Select = 6,
    Start = 7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum TomatoButton {
    A = 0,
    B = 1,
    Select = 2,
    Start = 3,
    Right = 4,
    Left = 5,
    Up = 6,
    Down = 7,
    R = 8,
    L = 9,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PeachButton {
    A = 0,
    B = 1,
    Select = 2,
    Start = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MangoButton {
    B = 0,
    Y = 1,
    Select = 2,
    Start = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
    A = 8,
    X = 9,
    L = 10,
    R = 11,
}

/// Native buttons of the Lychee core. Face buttons use shape names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum LycheeButton {
    Select = 0,
    Start = 3,
    Up = 4,
    Right = 5,
    Down = 6,
    Left = 7,
    L2 = 8,
    R2 = 9,
    L1 = 10,
    R1 = 11,
    Triangle = 12,
    Circle = 13,
    Cross = 14,
    Square = 15,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum LycheeStick {
    Left = 0,
    Right = 1,
}

/// Routes logical input to the active core's native constants.
#[derive(Debug)]
pub struct InputRouter {
    buttons: HashMap<(CoreId, LogicalButton), NativeButton>,
    sticks: HashMap<(CoreId, ThumbstickKind), NativeStick>,
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl InputRouter {
    pub fn new() -> Self {
        use LogicalButton as L;

        let mut buttons = HashMap::new();
        let mut add = |core: CoreId, pairs: &[(LogicalButton, u32)]| {
            for &(logical, native) in pairs {
                buttons.insert((core, logical), NativeButton(native));
            }
        };

        {
            use CytrusButton as C;
            add(CoreId::Cytrus, &[
                (L::A, C::A as u32),
                (L::B, C::B as u32),
                (L::X, C::X as u32),
                (L::Y, C::Y as u32),
                (L::Up, C::Up as u32),
                (L::Down, C::Down as u32),
                (L::Left, C::Left as u32),
                (L::Right, C::Right as u32),
                (L::L, C::L as u32),
                (L::R, C::R as u32),
                (L::ZL, C::Zl as u32),
                (L::ZR, C::Zr as u32),
                (L::Minus, C::Select as u32),
                (L::Plus, C::Start as u32),
                (L::Home, C::Home as u32),
            ]);
        }
        {
            use GrapeButton as G;
            add(CoreId::Grape, &[
                (L::A, G::A as u32),
                (L::B, G::B as u32),
                (L::X, G::X as u32),
                (L::Y, G::Y as u32),
                (L::Up, G::Up as u32),
                (L::Down, G::Down as u32),
                (L::Left, G::Left as u32),
                (L::Right, G::Right as u32),
                (L::L, G::L as u32),
                (L::R, G::R as u32),
                (L::Minus, G::Select as u32),
                (L::Plus, G::Start as u32),
            ]);
        }
        {
            use KiwiButton as K;
            add(CoreId::Kiwi, &[
                (L::A, K::A as u32),
                (L::B, K::B as u32),
                (L::Up, K::Up as u32),
                (L::Down, K::Down as u32),
                (L::Left, K::Left as u32),
                (L::Right, K::Right as u32),
                (L::Minus, K::Select as u32),
                (L::Plus, K::Start as u32),
            ]);
        }
        {
            use TomatoButton as T;
            add(CoreId::Tomato, &[
                (L::A, T::A as u32),
                (L::B, T::B as u32),
                (L::Up, T::Up as u32),
                (L::Down, T::Down as u32),
                (L::Left, T::Left as u32),
                (L::Right, T::Right as u32),
                (L::L, T::L as u32),
                (L::R, T::R as u32),
                (L::Minus, T::Select as u32),
                (L::Plus, T::Start as u32),
            ]);
        }
        {
            use PeachButton as P;
            add(CoreId::Peach, &[
                (L::A, P::A as u32),
                (L::B, P::B as u32),
                (L::Up, P::Up as u32),
                (L::Down, P::Down as u32),
                (L::Left, P::Left as u32),
                (L::Right, P::Right as u32),
                (L::Minus, P::Select as u32),
                (L::Plus, P::Start as u32),
            ]);
        }
        {
            use MangoButton as M;
            add(CoreId::Mango, &[
                (L::A, M::A as u32),
                (L::B, M::B as u32),
                (L::X, M::X as u32),
                (L::Y, M::Y as u32),
                (L::Up, M::Up as u32),
                (L::Down, M::Down as u32),
                (L::Left, M::Left as u32),
                (L::Right, M::Right as u32),
                (L::L, M::L as u32),
                (L::R, M::R as u32),
                (L::Minus, M::Select as u32),
                (L::Plus, M::Start as u32),
            ]);
        }
        {
            use LycheeButton as Y;
            add(CoreId::Lychee, &[
                (L::A, Y::Circle as u32),
                (L::B, Y::Cross as u32),
                (L::X, Y::Triangle as u32),
                (L::Y, Y::Square as u32),
                (L::Up, Y::Up as u32),
                (L::Down, Y::Down as u32),
                (L::Left, Y::Left as u32),
                (L::Right, Y::Right as u32),
                (L::L, Y::L1 as u32),
                (L::R, Y::R1 as u32),
                (L::ZL, Y::L2 as u32),
                (L::ZR, Y::R2 as u32),
                (L::Minus, Y::Select as u32),
                (L::Plus, Y::Start as u32),
            ]);
        }

        let mut sticks = HashMap::new();
        sticks.insert(
            (CoreId::Cytrus, ThumbstickKind::Left),
            NativeStick(CytrusStick::CirclePad as u32),
        );
        sticks.insert(
            (CoreId::Cytrus, ThumbstickKind::Right),
            NativeStick(CytrusStick::CStick as u32),
        );
        sticks.insert(
            (CoreId::Lychee, ThumbstickKind::Left),
            NativeStick(LycheeStick::Left as u32),
        );
        sticks.insert(
            (CoreId::Lychee, ThumbstickKind::Right),
            NativeStick(LycheeStick::Right as u32),
        );

        log::debug!(
            "Input router: {} button routes, {} stick routes",
            buttons.len(),
            sticks.len()
        );
        Self { buttons, sticks }
    }

    /// The native constant `button` maps to on `core`, if any.
    pub fn native_button(&self, core: CoreId, button: LogicalButton) -> Option<NativeButton> {
        self.buttons.get(&(core, button)).copied()
    }

    pub fn native_stick(&self, core: CoreId, stick: ThumbstickKind) -> Option<NativeStick> {
        self.sticks.get(&(core, stick)).copied()
    }

    pub fn touch_began(&self, button: LogicalButton, core: &mut dyn EmulationCore) {
        match button {
            LogicalButton::SaveState | LogicalButton::LoadState => {
                if !core.capabilities().save_states {
                    return;
                }
                let result = if button == LogicalButton::SaveState {
                    core.save_state()
                } else {
                    core.load_state()
                };
                if let Err(e) = result {
                    log::warn!("{} on {} failed: {e}", button_label(button), core.id());
                }
            },
            _ => {
                if let Some(native) = self.native_button(core.id(), button) {
                    core.button_down(native);
                }
            },
        }
    }

    pub fn touch_ended(&self, button: LogicalButton, core: &mut dyn EmulationCore) {
        if let Some(native) = self.native_button(core.id(), button) {
            core.button_up(native);
        }
    }

    pub fn thumbstick_moved(
        &self,
        stick: ThumbstickKind,
        vector: Vector2,
        core: &mut dyn EmulationCore,
    ) {
        if let Some(native) = self.native_stick(core.id(), stick) {
            core.thumbstick_moved(native, vector.x as f32, vector.y as f32);
        }
    }

    /// Forward one surface event.
    pub fn dispatch(&self, event: InputEvent, core: &mut dyn EmulationCore) {
        match event {
            InputEvent::ButtonDown(b) => self.touch_began(b, core),
            InputEvent::ButtonUp(b) => self.touch_ended(b, core),
            InputEvent::ThumbstickMoved(s, v) | InputEvent::ThumbstickEnded(s, v) => {
                self.thumbstick_moved(s, v, core)
            },
        }
    }
}

fn button_label(button: LogicalButton) -> &'static str {
    match button {
        LogicalButton::SaveState => "Save state",
        _ => "Load state",
    }
}
