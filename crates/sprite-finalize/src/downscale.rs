//! Block-mode (majority color) downscaling.
//!
//! Captures are taken at an integer multiple of the target size, so each
//! output pixel corresponds to a `step x step` block of input pixels. The
//! output pixel takes the most frequent exact RGBA value of its block. A
//! mode filter keeps hard pixel-art edges that an averaging filter would
//! smear into new, off-palette colors.

use std::collections::HashMap;

use crate::bitmap::Bitmap;

/// Reduce a bitmap by an integer factor per axis with a mode filter.
///
/// Each output pixel is the most frequent exact RGBA value of its source
/// block, scanned row-major; the running best is replaced only when a value
/// reaches a strictly higher count, so the first value to reach the maximum
/// wins ties. Always allocates a new bitmap; the caller discards the source.
///
/// # Panics
///
/// Panics if `step` is zero or does not divide both dimensions evenly. The
/// pipeline validates the ratio and reports it as a finalize error before
/// calling in here.
pub fn downscale(bitmap: &Bitmap, step: u32) -> Bitmap {
    assert!(step > 0, "downscale step must be positive");
    assert!(
        bitmap.width() % step == 0 && bitmap.height() % step == 0,
        "downscale step {} must divide {}x{} evenly",
        step,
        bitmap.width(),
        bitmap.height(),
    );

    let out_width = bitmap.width() / step;
    let out_height = bitmap.height() / step;
    let mut out = Bitmap::new(out_width, out_height);

    let mut counts: HashMap<u32, u32> = HashMap::new();

    for dy in 0..out_height {
        for dx in 0..out_width {
            counts.clear();
            let mut best = 0u32;
            let mut best_count = 0u32;

            for sy in dy * step..(dy + 1) * step {
                for sx in dx * step..(dx + 1) * step {
                    let [r, g, b, a] = bitmap.pixel(sx, sy);
                    let packed =
                        (r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8 | a as u32;
                    let count = counts.entry(packed).or_insert(0);
                    *count += 1;
                    if *count > best_count {
                        best = packed;
                        best_count = *count;
                    }
                }
            }

            out.set_pixel(
                dx,
                dy,
                [
                    (best >> 24) as u8,
                    (best >> 16) as u8,
                    (best >> 8) as u8,
                    best as u8,
                ],
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_dimensions() {
        let bitmap = Bitmap::new(12, 8);
        let out = downscale(&bitmap, 4);
        assert_eq!(out.width(), 3);
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn test_step_one_is_identity() {
        let mut bitmap = Bitmap::new(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                bitmap.set_pixel(x, y, [x as u8, y as u8, 77, 255]);
            }
        }
        let out = downscale(&bitmap, 1);
        assert_eq!(out, bitmap);
    }

    #[test]
    fn test_strict_majority_wins_regardless_of_arrangement() {
        let x = [200, 10, 10, 255];
        let y = [10, 10, 200, 255];

        // Majority pixel in every corner position of the 2x2 block.
        for minority_at in 0..4 {
            let mut bitmap = Bitmap::new(2, 2);
            for i in 0..4 {
                let px = if i == minority_at { y } else { x };
                bitmap.set_pixel(i % 2, i / 2, px);
            }
            let out = downscale(&bitmap, 2);
            assert_eq!(out.pixel(0, 0), x, "minority at position {minority_at}");
        }
    }

    #[test]
    fn test_tie_break_first_to_reach_max_count() {
        let x = [1, 1, 1, 255];
        let y = [2, 2, 2, 255];

        // Scan order x, x, y, y: x reaches count 2 first and keeps the win.
        let mut bitmap = Bitmap::new(2, 2);
        bitmap.set_pixel(0, 0, x);
        bitmap.set_pixel(1, 0, x);
        bitmap.set_pixel(0, 1, y);
        bitmap.set_pixel(1, 1, y);
        assert_eq!(downscale(&bitmap, 2).pixel(0, 0), x);

        // Scan order x, y, y, x: y reaches count 2 first (third pixel),
        // before x does (fourth), so y wins this tie.
        let mut bitmap = Bitmap::new(2, 2);
        bitmap.set_pixel(0, 0, x);
        bitmap.set_pixel(1, 0, y);
        bitmap.set_pixel(0, 1, y);
        bitmap.set_pixel(1, 1, x);
        assert_eq!(downscale(&bitmap, 2).pixel(0, 0), y);
    }

    #[test]
    fn test_all_distinct_block_picks_first_in_scan_order() {
        let mut bitmap = Bitmap::new(2, 2);
        bitmap.set_pixel(0, 0, [1, 0, 0, 255]);
        bitmap.set_pixel(1, 0, [2, 0, 0, 255]);
        bitmap.set_pixel(0, 1, [3, 0, 0, 255]);
        bitmap.set_pixel(1, 1, [4, 0, 0, 255]);

        assert_eq!(downscale(&bitmap, 2).pixel(0, 0), [1, 0, 0, 255]);
    }

    #[test]
    fn test_alpha_is_part_of_the_tallied_value() {
        // Same RGB at two alphas is two distinct values; the 3:1 alpha
        // majority must win.
        let mut bitmap = Bitmap::new(2, 2);
        bitmap.set_pixel(0, 0, [9, 9, 9, 0]);
        bitmap.set_pixel(1, 0, [9, 9, 9, 255]);
        bitmap.set_pixel(0, 1, [9, 9, 9, 255]);
        bitmap.set_pixel(1, 1, [9, 9, 9, 255]);

        assert_eq!(downscale(&bitmap, 2).pixel(0, 0), [9, 9, 9, 255]);
    }

    #[test]
    fn test_blocks_are_independent() {
        let mut bitmap = Bitmap::new(4, 2);
        // Left block solid red, right block solid blue.
        for y in 0..2 {
            for x in 0..2 {
                bitmap.set_pixel(x, y, [255, 0, 0, 255]);
                bitmap.set_pixel(x + 2, y, [0, 0, 255, 255]);
            }
        }
        let out = downscale(&bitmap, 2);
        assert_eq!(out.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(out.pixel(1, 0), [0, 0, 255, 255]);
    }

    #[test]
    #[should_panic(expected = "divide")]
    fn test_uneven_step_panics() {
        let bitmap = Bitmap::new(5, 4);
        let _ = downscale(&bitmap, 2);
    }
}
