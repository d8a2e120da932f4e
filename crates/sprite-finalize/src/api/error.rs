//! Unified error type for the finalization pipeline.
//!
//! Every variant is a caller error in the sense of the pipeline contract:
//! the stages themselves are total over valid inputs, so failures only come
//! from preconditions (empty palette, region outside the capture, a capture
//! size that is not an integer multiple of the target). They are fatal for
//! the single image being finalized, never retried, and carry enough detail
//! to identify the offending region or dimensions.

use crate::bitmap::Rect;
use crate::palette::PaletteError;
use std::fmt;

/// Unified error type for [`SpriteFinalizer`](crate::SpriteFinalizer).
#[derive(Debug, Clone, PartialEq)]
pub enum FinalizeError {
    /// Palette validation error (empty palette or bad hex color)
    Palette(PaletteError),
    /// A quantization region, after scaling to capture coordinates, does not
    /// fit inside the bitmap
    RegionOutOfBounds {
        /// The scaled region in capture coordinates
        region: Rect,
        /// Bitmap width at the time the region was applied
        width: u32,
        /// Bitmap height at the time the region was applied
        height: u32,
    },
    /// The capture width is not an integer multiple of the target width
    FractionalScale {
        /// Bitmap width entering the stage
        width: u32,
        /// Requested target width
        target: u32,
    },
    /// The capture height does not equal the target height times the step
    /// derived from the widths
    HeightMismatch {
        /// Bitmap height entering the downscale stage
        height: u32,
        /// Requested target height
        target_height: u32,
        /// Step derived from the width ratio
        step: u32,
    },
}

impl fmt::Display for FinalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalizeError::Palette(err) => write!(f, "palette error: {}", err),
            FinalizeError::RegionOutOfBounds {
                region,
                width,
                height,
            } => write!(
                f,
                "quantize region {}x{} at ({}, {}) exceeds {}x{} capture",
                region.width, region.height, region.x, region.y, width, height
            ),
            FinalizeError::FractionalScale { width, target } => write!(
                f,
                "capture width {} is not an integer multiple of target width {}",
                width, target
            ),
            FinalizeError::HeightMismatch {
                height,
                target_height,
                step,
            } => write!(
                f,
                "capture height {} does not match target height {} at step {}",
                height, target_height, step
            ),
        }
    }
}

impl std::error::Error for FinalizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FinalizeError::Palette(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PaletteError> for FinalizeError {
    fn from(err: PaletteError) -> Self {
        FinalizeError::Palette(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_identifies_offending_region() {
        let err = FinalizeError::RegionOutOfBounds {
            region: Rect::new(10, 20, 30, 40),
            width: 32,
            height: 32,
        };
        assert_eq!(
            err.to_string(),
            "quantize region 30x40 at (10, 20) exceeds 32x32 capture"
        );
    }

    #[test]
    fn test_display_fractional_scale() {
        let err = FinalizeError::FractionalScale {
            width: 300,
            target: 128,
        };
        assert_eq!(
            err.to_string(),
            "capture width 300 is not an integer multiple of target width 128"
        );
    }

    #[test]
    fn test_palette_error_wraps() {
        let err: FinalizeError = PaletteError::Empty.into();
        assert_eq!(err.to_string(), "palette error: palette cannot be empty");
    }
}
