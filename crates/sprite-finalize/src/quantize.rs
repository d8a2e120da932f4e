//! Region-scoped palette quantization.
//!
//! Snaps every pixel inside a rectangle to the nearest color of a fixed
//! palette, measured in LAB space. Distinct panels of one capture can carry
//! distinct palettes, so regions are applied independently and in declared
//! order; where regions overlap, the later one wins by running last.

use crate::api::FinalizeError;
use crate::bitmap::{Bitmap, Rect};
use crate::color::rgb_to_lab;
use crate::palette::Palette;

/// A quantization request: a rectangle and the palette to snap it to.
///
/// The rect is declared in target-resolution coordinates; the pipeline
/// scales it by the capture step before applying it to the raw bitmap.
#[derive(Debug, Clone)]
pub struct QuantizeRegion {
    pub rect: Rect,
    pub palette: Palette,
}

impl QuantizeRegion {
    pub fn new(rect: Rect, palette: Palette) -> Self {
        Self { rect, palette }
    }
}

/// Snap every pixel inside `rect` to the nearest palette color, in place.
///
/// Only RGB is overwritten; alpha is untouched, and pixels outside `rect`
/// are left byte-identical. The nearest entry is chosen in LAB space with
/// the palette's first-minimal-wins tie-break.
///
/// # Errors
///
/// [`FinalizeError::RegionOutOfBounds`] if `rect` does not fit inside the
/// bitmap; nothing is mutated in that case.
pub fn quantize_region(
    bitmap: &mut Bitmap,
    rect: Rect,
    palette: &Palette,
) -> Result<(), FinalizeError> {
    if !rect.fits_within(bitmap.width(), bitmap.height()) {
        return Err(FinalizeError::RegionOutOfBounds {
            region: rect,
            width: bitmap.width(),
            height: bitmap.height(),
        });
    }

    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let i = bitmap.offset(x, y);
            let data = bitmap.data_mut();
            let lab = rgb_to_lab(data[i], data[i + 1], data[i + 2]);
            let [r, g, b] = palette.color(palette.find_nearest(&lab));
            data[i] = r;
            data[i + 1] = g;
            data[i + 2] = b;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Bitmap {
        let mut bitmap = Bitmap::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y * width) * 7 % 256) as u8;
                bitmap.set_pixel(x, y, [v, v / 2, 255 - v, 200]);
            }
        }
        bitmap
    }

    #[test]
    fn test_region_pixels_only_palette_colors() {
        let mut bitmap = gradient(8, 8);
        let palette = Palette::new(&[[0, 0, 0], [255, 255, 255], [255, 0, 0]]).unwrap();
        let rect = Rect::new(2, 2, 4, 4);

        quantize_region(&mut bitmap, rect, &palette).unwrap();

        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                let [r, g, b, _] = bitmap.pixel(x, y);
                assert!(
                    (0..palette.len()).any(|i| palette.color(i) == [r, g, b]),
                    "pixel at ({x}, {y}) is [{r}, {g}, {b}], not a palette color"
                );
            }
        }
    }

    #[test]
    fn test_out_of_region_pixels_byte_identical() {
        let mut bitmap = gradient(8, 8);
        let before = bitmap.clone();
        let palette = Palette::new(&[[0, 0, 0]]).unwrap();
        let rect = Rect::new(2, 2, 4, 4);

        quantize_region(&mut bitmap, rect, &palette).unwrap();

        for y in 0..8 {
            for x in 0..8 {
                let inside =
                    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom();
                if !inside {
                    assert_eq!(bitmap.pixel(x, y), before.pixel(x, y));
                }
            }
        }
    }

    #[test]
    fn test_alpha_untouched() {
        let mut bitmap = Bitmap::new(2, 1);
        bitmap.set_pixel(0, 0, [100, 100, 100, 42]);
        bitmap.set_pixel(1, 0, [100, 100, 100, 0]);
        let palette = Palette::new(&[[255, 255, 255]]).unwrap();

        quantize_region(&mut bitmap, Rect::new(0, 0, 2, 1), &palette).unwrap();

        assert_eq!(bitmap.pixel(0, 0), [255, 255, 255, 42]);
        assert_eq!(bitmap.pixel(1, 0), [255, 255, 255, 0]);
    }

    #[test]
    fn test_mid_gray_snaps_to_white_not_a_blend() {
        // L of sRGB 128 gray is ~53.59: nearer white (L 100) than black
        // (L 0) in LAB, so a black/white palette turns the whole region
        // white -- exactly one palette color, no averaging.
        let mut bitmap = Bitmap::new(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                bitmap.set_pixel(x, y, [128, 128, 128, 255]);
            }
        }
        let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]]).unwrap();

        quantize_region(&mut bitmap, Rect::new(0, 0, 3, 3), &palette).unwrap();

        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(bitmap.pixel(x, y), [255, 255, 255, 255]);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_region_fails_without_mutation() {
        let mut bitmap = gradient(4, 4);
        let before = bitmap.clone();
        let palette = Palette::new(&[[0, 0, 0]]).unwrap();

        let err = quantize_region(&mut bitmap, Rect::new(2, 2, 4, 4), &palette).unwrap_err();
        assert_eq!(
            err,
            FinalizeError::RegionOutOfBounds {
                region: Rect::new(2, 2, 4, 4),
                width: 4,
                height: 4,
            }
        );
        assert_eq!(bitmap, before);
    }

    #[test]
    fn test_empty_rect_is_a_no_op() {
        let mut bitmap = gradient(4, 4);
        let before = bitmap.clone();
        let palette = Palette::new(&[[0, 0, 0]]).unwrap();

        quantize_region(&mut bitmap, Rect::new(1, 1, 0, 0), &palette).unwrap();
        assert_eq!(bitmap, before);
    }

    #[test]
    fn test_overlapping_regions_apply_in_call_order() {
        let mut bitmap = Bitmap::new(2, 1);
        bitmap.set_pixel(0, 0, [128, 128, 128, 255]);
        bitmap.set_pixel(1, 0, [128, 128, 128, 255]);

        let to_black = Palette::new(&[[0, 0, 0]]).unwrap();
        let to_white = Palette::new(&[[255, 255, 255]]).unwrap();

        quantize_region(&mut bitmap, Rect::new(0, 0, 2, 1), &to_black).unwrap();
        quantize_region(&mut bitmap, Rect::new(1, 0, 1, 1), &to_white).unwrap();

        assert_eq!(bitmap.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(bitmap.pixel(1, 0), [255, 255, 255, 255]);
    }
}
