//! On-screen input for Folium.
//!
//! The surface turns raw touches on a resolved layout into normalized
//! [`InputEvent`](folium_types::InputEvent)s; the router turns those into
//! calls on the running core using each core's native numbering.

pub mod animation;
pub mod router;
pub mod surface;

pub use router::InputRouter;
pub use surface::{
    ButtonElement, ButtonState, Haptics, InputSurface, NoHaptics, ThumbstickElement, TouchId,
    haptics_sink,
};
