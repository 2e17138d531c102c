//! Source pixel formats and frame geometry.

use folium_types::CoreId;
use folium_types::error::{FoliumError, Result};

/// A palette entry for indexed formats.
pub type Rgb = [u8; 3];

/// Native pixel layouts produced by the supported cores.
///
/// 16-bit formats are read as little-endian words. 32-bit formats are named
/// by their byte order in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// `rrrrrggg gggbbbbb`, red in the high bits.
    Rgb565,
    /// `xbbbbbgg gggrrrrr`, red in the low bits, top bit unused.
    Bgr555,
    Rgba8888,
    Argb8888,
    Bgra8888,
    /// One byte per pixel, looked up in a caller-supplied palette.
    Indexed8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Indexed8 => 1,
            Self::Rgb565 | Self::Bgr555 => 2,
            Self::Rgba8888 | Self::Argb8888 | Self::Bgra8888 => 4,
        }
    }
}

/// Where a picture lives inside a raw core buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDescriptor {
    /// Row stride of the source, in pixels.
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub format: PixelFormat,
    /// Pixels to skip before the canvas starts (second screen of a
    /// dual-screen buffer).
    pub offset_pixels: usize,
    /// Valid top-left region, when smaller than the canvas.
    pub display: Option<(u32, u32)>,
}

impl FrameDescriptor {
    pub fn new(canvas_width: u32, canvas_height: u32, format: PixelFormat) -> Self {
        Self {
            canvas_width,
            canvas_height,
            format,
            offset_pixels: 0,
            display: None,
        }
    }

    pub fn with_offset(mut self, offset_pixels: usize) -> Self {
        self.offset_pixels = offset_pixels;
        self
    }

    pub fn with_display(mut self, width: u32, height: u32) -> Self {
        self.display = Some((width, height));
        self
    }

    /// Size of the output image.
    pub fn output_size(&self) -> (u32, u32) {
        self.display.unwrap_or((self.canvas_width, self.canvas_height))
    }

    /// Bytes the source buffer must hold for this descriptor.
    pub fn required_len(&self) -> Option<usize> {
        let pixels = (self.canvas_width as usize).checked_mul(self.canvas_height as usize)?;
        self.offset_pixels
            .checked_add(pixels)?
            .checked_mul(self.format.bytes_per_pixel())
    }

    /// Check the descriptor against a buffer of `len` bytes.
    pub fn validate(&self, len: usize) -> Result<()> {
        if let Some((w, h)) = self.display
            && (w > self.canvas_width || h > self.canvas_height)
        {
            return Err(FoliumError::Framebuffer(format!(
                "display region {w}x{h} exceeds canvas {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        let needed = self.required_len().ok_or_else(|| {
            FoliumError::Framebuffer(format!(
                "canvas {}x{} overflows",
                self.canvas_width, self.canvas_height
            ))
        })?;
        if len < needed {
            return Err(FoliumError::Framebuffer(format!(
                "buffer holds {len} bytes, {:?} {}x{} at offset {} needs {needed}",
                self.format, self.canvas_width, self.canvas_height, self.offset_pixels
            )));
        }
        Ok(())
    }

    /// Preset for screen `screen` of `core`.
    ///
    /// Dual-screen cores pack the second screen directly after the first;
    /// Lychee and Mango render into a fixed canvas whose valid region is
    /// reported per frame by the core.
    pub fn for_core(core: CoreId, screen: usize) -> Option<Self> {
        let desc = match (core, screen) {
            (CoreId::Cytrus, 0) => Self::new(400, 240, PixelFormat::Rgba8888),
            (CoreId::Cytrus, 1) => {
                Self::new(320, 240, PixelFormat::Rgba8888).with_offset(400 * 240)
            },
            (CoreId::Grape, 0) => Self::new(256, 192, PixelFormat::Bgr555),
            (CoreId::Grape, 1) => Self::new(256, 192, PixelFormat::Bgr555).with_offset(256 * 192),
            (CoreId::Kiwi, 0) => Self::new(160, 144, PixelFormat::Rgb565),
            (CoreId::Lychee, 0) => Self::new(1024, 512, PixelFormat::Bgr555).with_display(320, 240),
            (CoreId::Mango, 0) => Self::new(512, 480, PixelFormat::Rgb565).with_display(256, 224),
            (CoreId::Peach, 0) => Self::new(256, 240, PixelFormat::Indexed8),
            (CoreId::Tomato, 0) => Self::new(240, 160, PixelFormat::Bgr555),
            _ => return None,
        };
        Some(desc)
    }
}
