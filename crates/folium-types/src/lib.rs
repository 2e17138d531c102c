//! Foundation types for Folium.
//!
//! This crate holds the platform-agnostic vocabulary shared by every other
//! Folium crate: screen geometry, emulation core identifiers, the
//! core-agnostic button/thumbstick vocabulary, input events, configuration,
//! and the error type.

pub mod backend;
pub mod config;
pub mod core_id;
pub mod error;
pub mod geometry;
pub mod input;

pub use backend::{CoreCapabilities, EmulationCore, NativeButton, NativeStick};
pub use core_id::CoreId;
pub use error::{FoliumError, Result};
pub use geometry::{DeviceClass, Insets, Orientation, Point, Rect, Size, Viewport};
pub use input::{InputEvent, LogicalButton, ThumbstickKind, Vector2};
