//! Framebuffer presentation for Folium.
//!
//! Cores hand over raw frames in their native pixel format, sometimes in a
//! canvas larger than the visible picture and sometimes with two screens
//! packed back to back. This crate turns such a buffer into a tightly
//! packed RGBA image, and moves frames from the core thread to the
//! presentation thread without queuing.

pub mod decode;
pub mod format;
pub mod image;
pub mod slot;

pub use decode::decode;
pub use format::{FrameDescriptor, PixelFormat, Rgb};
pub use image::DisplayImage;
pub use slot::{Frame, FrameSlot};
