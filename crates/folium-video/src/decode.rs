//! Pixel format conversion.
//!
//! Every conversion validates the descriptor against the buffer before
//! touching it, then walks only the visible region row by row.

use folium_types::error::{FoliumError, Result};

use crate::format::{FrameDescriptor, PixelFormat, Rgb};
use crate::image::DisplayImage;

/// Expand a 5-bit channel to 8 bits by bit replication.
#[inline]
pub fn expand5(v: u16) -> u8 {
    let v = (v & 0x1F) as u8;
    (v << 3) | (v >> 2)
}

/// Expand a 6-bit channel to 8 bits by bit replication.
#[inline]
pub fn expand6(v: u16) -> u8 {
    let v = (v & 0x3F) as u8;
    (v << 2) | (v >> 4)
}

/// Convert the visible region of `raw` to RGBA8888.
///
/// `palette` is required for [`PixelFormat::Indexed8`] and ignored
/// otherwise. Indices past the end of the palette decode as black.
pub fn decode(raw: &[u8], desc: &FrameDescriptor, palette: Option<&[Rgb]>) -> Result<DisplayImage> {
    desc.validate(raw.len())?;
    if desc.format == PixelFormat::Indexed8 && palette.is_none() {
        return Err(FoliumError::Framebuffer("indexed frame without a palette".into()));
    }

    let (width, height) = desc.output_size();
    let bpp = desc.format.bytes_per_pixel();
    let stride = desc.canvas_width as usize * bpp;
    let base = desc.offset_pixels * bpp;
    let row_bytes = width as usize * bpp;

    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height as usize {
        let start = base + y * stride;
        let row = &raw[start..start + row_bytes];
        match desc.format {
            PixelFormat::Rgb565 => {
                for px in row.chunks_exact(2) {
                    let v = u16::from_le_bytes([px[0], px[1]]);
                    rgba.extend_from_slice(&[expand5(v >> 11), expand6(v >> 5), expand5(v), 0xFF]);
                }
            },
            PixelFormat::Bgr555 => {
                for px in row.chunks_exact(2) {
                    let v = u16::from_le_bytes([px[0], px[1]]);
                    rgba.extend_from_slice(&[expand5(v), expand5(v >> 5), expand5(v >> 10), 0xFF]);
                }
            },
            PixelFormat::Rgba8888 => rgba.extend_from_slice(row),
            PixelFormat::Argb8888 => {
                for px in row.chunks_exact(4) {
                    rgba.extend_from_slice(&[px[1], px[2], px[3], px[0]]);
                }
            },
            PixelFormat::Bgra8888 => {
                for px in row.chunks_exact(4) {
                    rgba.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
                }
            },
            PixelFormat::Indexed8 => {
                let palette = palette.unwrap_or(&[]);
                for &index in row {
                    let [r, g, b] = palette.get(index as usize).copied().unwrap_or([0, 0, 0]);
                    rgba.extend_from_slice(&[r, g, b, 0xFF]);
                }
            },
        }
    }

    Ok(DisplayImage { width, height, rgba })
}

#[cfg(test)]
mod tests {
    use folium_types::CoreId;
    use proptest::prelude::*;

    use super::*;

    fn bgr555(r: u16, g: u16, b: u16) -> [u8; 2] {
        (r | (g << 5) | (b << 10)).to_le_bytes()
    }

    fn rgb565(r: u16, g: u16, b: u16) -> [u8; 2] {
        ((r << 11) | (g << 5) | b).to_le_bytes()
    }

    #[test]
    fn expansion_replicates_high_bits() {
        assert_eq!(expand5(0), 0);
        assert_eq!(expand5(0x1F), 0xFF);
        assert_eq!(expand5(0x10), 0x84);
        assert_eq!(expand6(0x3F), 0xFF);
        assert_eq!(expand6(0x20), 0x82);
    }

    #[test]
    fn crops_large_bgr555_canvas() {
        // 1024x512 canvas; only the top-left 320x240 is live.
        let mut raw = vec![0u8; 1024 * 512 * 2];
        let put = |raw: &mut Vec<u8>, x: usize, y: usize, px: [u8; 2]| {
            let i = (y * 1024 + x) * 2;
            raw[i..i + 2].copy_from_slice(&px);
        };
        put(&mut raw, 0, 0, bgr555(31, 0, 0));
        put(&mut raw, 319, 239, bgr555(0, 0, 31));
        put(&mut raw, 320, 0, bgr555(0, 31, 0));
        put(&mut raw, 1023, 511, bgr555(31, 31, 31));

        let desc = FrameDescriptor::for_core(CoreId::Lychee, 0).unwrap();
        let img = decode(&raw, &desc, None).unwrap();
        assert_eq!((img.width, img.height), (320, 240));
        assert_eq!(img.rgba.len(), 320 * 240 * 4);
        assert_eq!(img.pixel(0, 0), Some([0xFF, 0, 0, 0xFF]));
        assert_eq!(img.pixel(319, 239), Some([0, 0, 0xFF, 0xFF]));
        // Column 320 of the canvas is cropped away.
        assert_eq!(img.pixel(319, 0), Some([0, 0, 0, 0xFF]));
    }

    #[test]
    fn second_screen_is_read_from_offset() {
        let top = vec![0u8; 256 * 192 * 2];
        let mut bottom = vec![0u8; 256 * 192 * 2];
        bottom[..2].copy_from_slice(&bgr555(0, 31, 0));
        let raw = [top, bottom].concat();

        let desc = FrameDescriptor::for_core(CoreId::Grape, 1).unwrap();
        let img = decode(&raw, &desc, None).unwrap();
        assert_eq!(img.pixel(0, 0), Some([0, 0xFF, 0, 0xFF]));

        let top = FrameDescriptor::for_core(CoreId::Grape, 0).unwrap();
        let top_img = decode(&raw, &top, None).unwrap();
        assert_eq!(top_img.pixel(0, 0), Some([0, 0, 0, 0xFF]));
    }

    #[test]
    fn short_buffer_fails_before_reading() {
        let desc = FrameDescriptor::for_core(CoreId::Lychee, 0).unwrap();
        let raw = vec![0u8; 320 * 240 * 2];
        let err = decode(&raw, &desc, None).unwrap_err();
        assert!(err.to_string().contains("needs"), "{err}");
    }

    #[test]
    fn rgb565_channels() {
        let raw: Vec<u8> = [rgb565(31, 0, 0), rgb565(0, 63, 0), rgb565(0, 0, 31)].concat();
        let img = decode(&raw, &FrameDescriptor::new(3, 1, PixelFormat::Rgb565), None).unwrap();
        assert_eq!(img.rgba, vec![0xFF, 0, 0, 0xFF, 0, 0xFF, 0, 0xFF, 0, 0, 0xFF, 0xFF]);
    }

    #[test]
    fn thirty_two_bit_orders() {
        let raw = [0x10, 0x20, 0x30, 0x40];
        let rgba = decode(&raw, &FrameDescriptor::new(1, 1, PixelFormat::Rgba8888), None).unwrap();
        assert_eq!(rgba.rgba, vec![0x10, 0x20, 0x30, 0x40]);
        let argb = decode(&raw, &FrameDescriptor::new(1, 1, PixelFormat::Argb8888), None).unwrap();
        assert_eq!(argb.rgba, vec![0x20, 0x30, 0x40, 0x10]);
        let bgra = decode(&raw, &FrameDescriptor::new(1, 1, PixelFormat::Bgra8888), None).unwrap();
        assert_eq!(bgra.rgba, vec![0x30, 0x20, 0x10, 0x40]);
    }

    #[test]
    fn indexed_uses_palette() {
        let palette: [Rgb; 2] = [[1, 2, 3], [4, 5, 6]];
        let raw = [1u8, 0, 9];
        let desc = FrameDescriptor::new(3, 1, PixelFormat::Indexed8);
        let img = decode(&raw, &desc, Some(&palette)).unwrap();
        assert_eq!(img.rgba, vec![4, 5, 6, 0xFF, 1, 2, 3, 0xFF, 0, 0, 0, 0xFF]);
        assert!(decode(&raw, &desc, None).is_err());
    }

    proptest! {
        #[test]
        fn rgb565_round_trip_within_precision(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let v = ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3);
            let desc = FrameDescriptor::new(1, 1, PixelFormat::Rgb565);
            let img = decode(&v.to_le_bytes(), &desc, None).unwrap();
            let [dr, dg, db, da] = img.pixel(0, 0).unwrap();
            prop_assert!(dr.abs_diff(r) < 8);
            prop_assert!(dg.abs_diff(g) < 4);
            prop_assert!(db.abs_diff(b) < 8);
            prop_assert_eq!(da, 0xFF);
        }

        #[test]
        fn bgr555_round_trip_within_precision(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let px = bgr555(r as u16 >> 3, g as u16 >> 3, b as u16 >> 3);
            let img = decode(&px, &FrameDescriptor::new(1, 1, PixelFormat::Bgr555), None).unwrap();
            let [dr, dg, db, _] = img.pixel(0, 0).unwrap();
            prop_assert!(dr.abs_diff(r) < 8);
            prop_assert!(dg.abs_diff(g) < 8);
            prop_assert!(db.abs_diff(b) < 8);
        }

        #[test]
        fn decode_never_panics_on_short_input(len in 0usize..64, w in 0u32..8, h in 0u32..8) {
            let raw = vec![0xAAu8; len];
            let desc = FrameDescriptor::new(w, h, PixelFormat::Argb8888);
            let _ = decode(&raw, &desc, None);
        }
    }
}
