//! Skin system -- declarative on-screen controller layouts.
//!
//! A skin is a JSON document (`info.json`) targeting one core, with a
//! layout of buttons, thumbsticks and screen viewports per interface
//! orientation. The repository discovers skins on disk, the resolver picks
//! and materializes a layout for the current orientation and viewport, and
//! the default module generates a layout when no skin applies.

pub mod default;
pub mod document;
pub mod repository;
pub mod resolver;

pub use document::{
    Author, ButtonDef, ControlStyle, Layout, Orientations, ScreenDef, Skin, SkinDocument,
    Social, ThumbstickDef,
};
pub use repository::{SkinLoadFailure, SkinRepository};
pub use resolver::{
    LayoutSource, RenderDescriptor, ResolvedButton, ResolvedLayout, ResolvedThumbstick,
    materialize, resolve, resolve_for_session,
};
