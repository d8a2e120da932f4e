//! SpriteFinalizer builder -- the primary entry point for the crate.
//!
//! [`SpriteFinalizer`] describes how one class of captures is finalized
//! (target size, autocrop, quantization regions) and can be applied to any
//! number of bitmaps.

use crate::alpha::decode_sentinels;
use crate::api::FinalizeError;
use crate::autocrop::autocrop;
use crate::bitmap::{Bitmap, Rect};
use crate::downscale::downscale;
use crate::palette::Palette;
use crate::quantize::{quantize_region, QuantizeRegion};

/// High-level finalization builder for captured UI bitmaps.
///
/// A `SpriteFinalizer` holds the per-asset configuration and runs the fixed
/// stage order on demand:
///
/// 1. autocrop to content bounds (optional)
/// 2. region palette quantization, regions in declared order, rects scaled
///    from target to capture coordinates
/// 3. sentinel alpha decoding
/// 4. block-mode downscale to the target size (when the capture is larger)
///
/// The order is significant: autocrop inspects pre-decoding alpha and fixes
/// the geometry every later stage sees; quantization reads the sentinel
/// colors before they are decoded; the downscale tallies decoded RGBA
/// values.
///
/// # Design
///
/// - Configuration methods consume and return `self` (standard builder
///   pattern)
/// - [`finalize()`](Self::finalize) takes `&self`, so one builder is
///   **reusable** across bitmaps
/// - The bitmap is consumed and a new owned bitmap is returned; no stage
///   ever shares a buffer with another
///
/// # Example
///
/// ```
/// use sprite_finalize::{Bitmap, Palette, Rect, SpriteFinalizer};
///
/// let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]]).unwrap();
/// let finalizer = SpriteFinalizer::new(4, 4)
///     .quantize_region(Rect::new(0, 0, 4, 4), palette);
///
/// let capture = Bitmap::new(8, 8); // captured at 2x
/// let sprite = finalizer.finalize(capture).unwrap();
///
/// assert_eq!(sprite.width(), 4);
/// assert_eq!(sprite.height(), 4);
/// ```
#[derive(Debug)]
pub struct SpriteFinalizer {
    target_width: u32,
    target_height: u32,
    autocrop: bool,
    regions: Vec<QuantizeRegion>,
}

impl SpriteFinalizer {
    /// Create a finalizer for the given target sprite dimensions.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(target_width: u32, target_height: u32) -> Self {
        assert!(
            target_width > 0 && target_height > 0,
            "target dimensions must be positive"
        );
        Self {
            target_width,
            target_height,
            autocrop: false,
            regions: Vec::new(),
        }
    }

    /// Enable or disable content-bounds autocropping.
    #[inline]
    pub fn autocrop(mut self, enabled: bool) -> Self {
        self.autocrop = enabled;
        self
    }

    /// Add a quantization region.
    ///
    /// `rect` is in target-resolution coordinates. Regions apply in the
    /// order they are added; a later overlapping region wins.
    #[inline]
    pub fn quantize_region(mut self, rect: Rect, palette: Palette) -> Self {
        self.regions.push(QuantizeRegion::new(rect, palette));
        self
    }

    /// Target width in pixels.
    #[inline]
    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    /// Target height in pixels.
    #[inline]
    pub fn target_height(&self) -> u32 {
        self.target_height
    }

    /// Run the full finalization pipeline on one capture.
    ///
    /// Consumes the raw bitmap and returns the finalized one. The pipeline
    /// is a bounded, deterministic computation: no I/O, no retries, no
    /// partial results -- on error the bitmap is dropped and the capture
    /// should be reported failed by the caller.
    ///
    /// # Errors
    ///
    /// - [`FinalizeError::RegionOutOfBounds`] when a scaled region exceeds
    ///   the capture
    /// - [`FinalizeError::FractionalScale`] when the capture width is not an
    ///   integer multiple of the target width (needed as soon as regions
    ///   must be scaled or the bitmap must shrink)
    /// - [`FinalizeError::HeightMismatch`] when the capture height does not
    ///   agree with the width-derived step
    pub fn finalize(&self, bitmap: Bitmap) -> Result<Bitmap, FinalizeError> {
        let mut bitmap = bitmap;

        if self.autocrop {
            bitmap = autocrop(bitmap);
        }

        if !self.regions.is_empty() {
            let step = self.capture_step(bitmap.width())?;
            for region in &self.regions {
                quantize_region(&mut bitmap, region.rect.scaled(step), &region.palette)?;
            }
        }

        decode_sentinels(&mut bitmap);

        if bitmap.width() != self.target_width || bitmap.height() != self.target_height {
            let step = self.capture_step(bitmap.width())?;
            if bitmap.height() != self.target_height * step {
                return Err(FinalizeError::HeightMismatch {
                    height: bitmap.height(),
                    target_height: self.target_height,
                    step,
                });
            }
            bitmap = downscale(&bitmap, step);
        }

        Ok(bitmap)
    }

    /// The integer factor between capture width and target width.
    ///
    /// Captures are taken at an integer multiple of the target size; a
    /// width that is not such a multiple (autocrop can produce one) has no
    /// defined mapping back to target coordinates.
    fn capture_step(&self, width: u32) -> Result<u32, FinalizeError> {
        if width == 0 || width % self.target_width != 0 {
            return Err(FinalizeError::FractionalScale {
                width,
                target: self.target_width,
            });
        }
        Ok(width / self.target_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Bitmap {
        let mut bitmap = Bitmap::new(width, height);
        for y in 0..height {
            for x in 0..width {
                bitmap.set_pixel(x, y, rgba);
            }
        }
        bitmap
    }

    #[test]
    fn test_passthrough_at_target_size() {
        let finalizer = SpriteFinalizer::new(4, 4);
        let bitmap = solid(4, 4, [10, 20, 30, 255]);
        let out = finalizer.finalize(bitmap.clone()).unwrap();
        assert_eq!(out, bitmap);
    }

    #[test]
    fn test_region_rect_scaled_to_capture_coordinates() {
        // 4x4 target captured at 2x. A 1x1 target-space region at (1, 1)
        // must quantize the 2x2 capture block at (2, 2).
        let mut bitmap = solid(8, 8, [200, 200, 200, 255]);
        for y in 2..4 {
            for x in 2..4 {
                bitmap.set_pixel(x, y, [120, 120, 120, 255]);
            }
        }

        let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]]).unwrap();
        let finalizer =
            SpriteFinalizer::new(4, 4).quantize_region(Rect::new(1, 1, 1, 1), palette);

        let out = finalizer.finalize(bitmap).unwrap();
        assert_eq!(out.width(), 4);
        assert_eq!(out.pixel(1, 1), [255, 255, 255, 255]);
        // Outside the region the gray survived untouched (mode of a solid
        // block is the block's color).
        assert_eq!(out.pixel(0, 0), [200, 200, 200, 255]);
    }

    #[test]
    fn test_downscale_runs_only_when_sizes_differ() {
        let finalizer = SpriteFinalizer::new(2, 2);
        let out = finalizer.finalize(solid(6, 6, [1, 2, 3, 255])).unwrap();
        assert_eq!(out.width(), 2);
        assert_eq!(out.height(), 2);
        assert_eq!(out.pixel(0, 0), [1, 2, 3, 255]);
    }

    #[test]
    fn test_fractional_scale_is_an_error() {
        let finalizer = SpriteFinalizer::new(4, 4);
        let err = finalizer.finalize(solid(6, 6, [0, 0, 0, 255])).unwrap_err();
        assert_eq!(
            err,
            FinalizeError::FractionalScale {
                width: 6,
                target: 4
            }
        );
    }

    #[test]
    fn test_height_mismatch_is_an_error() {
        let finalizer = SpriteFinalizer::new(4, 4);
        let err = finalizer.finalize(solid(8, 12, [0, 0, 0, 255])).unwrap_err();
        assert_eq!(
            err,
            FinalizeError::HeightMismatch {
                height: 12,
                target_height: 4,
                step: 2,
            }
        );
    }

    #[test]
    fn test_region_out_of_bounds_names_scaled_region() {
        let palette = Palette::new(&[[0, 0, 0]]).unwrap();
        let finalizer =
            SpriteFinalizer::new(4, 4).quantize_region(Rect::new(3, 3, 2, 2), palette);

        let err = finalizer.finalize(solid(8, 8, [0, 0, 0, 255])).unwrap_err();
        assert_eq!(
            err,
            FinalizeError::RegionOutOfBounds {
                region: Rect::new(6, 6, 4, 4),
                width: 8,
                height: 8,
            }
        );
    }

    #[test]
    fn test_autocrop_runs_before_region_scaling() {
        // A 12x12 canvas whose visible content is an 8x8 block: after
        // autocrop the capture is 8x8, step is 2, and a full-target region
        // quantizes the whole cropped bitmap.
        let mut bitmap = Bitmap::new(12, 12);
        for y in 2..10 {
            for x in 2..10 {
                bitmap.set_pixel(x, y, [128, 128, 128, 255]);
            }
        }

        let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]]).unwrap();
        let finalizer = SpriteFinalizer::new(4, 4)
            .autocrop(true)
            .quantize_region(Rect::new(0, 0, 4, 4), palette);

        let out = finalizer.finalize(bitmap).unwrap();
        assert_eq!(out.width(), 4);
        assert_eq!(out.height(), 4);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.pixel(x, y), [255, 255, 255, 255]);
            }
        }
    }

    #[test]
    fn test_builder_is_reusable() {
        let finalizer = SpriteFinalizer::new(2, 2);
        let a = finalizer.finalize(solid(4, 4, [5, 5, 5, 255])).unwrap();
        let b = finalizer.finalize(solid(2, 2, [6, 6, 6, 255])).unwrap();
        assert_eq!(a.pixel(0, 0), [5, 5, 5, 255]);
        assert_eq!(b.pixel(0, 0), [6, 6, 6, 255]);
    }

    #[test]
    #[should_panic(expected = "positive")]
    fn test_zero_target_dimension_panics() {
        let _ = SpriteFinalizer::new(0, 4);
    }
}
