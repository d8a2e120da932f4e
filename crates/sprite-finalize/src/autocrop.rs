//! Content-bounds autocropping.
//!
//! Trims a capture to the tight bounding box of its visible content before
//! any other stage runs. "Visible" means alpha > 1: alpha values of 0 and 1
//! both count as empty, so near-invisible antialiasing fringes do not
//! inflate the box. This stage inspects pre-decoding alpha and therefore
//! must run before sentinel decoding.

use crate::bitmap::{Bitmap, Rect};

/// Pixels qualify as content only above this alpha value.
const EMPTY_ALPHA_MAX: u8 = 1;

/// The tight bounding box of all pixels with alpha > 1, or `None` when the
/// bitmap has no such pixel.
pub fn content_bounds(bitmap: &Bitmap) -> Option<Rect> {
    let mut x0 = u32::MAX;
    let mut x1 = 0u32;
    let mut y0 = u32::MAX;
    let mut y1 = 0u32;
    let mut found = false;

    for y in 0..bitmap.height() {
        for x in 0..bitmap.width() {
            let alpha = bitmap.data()[bitmap.offset(x, y) + 3];
            if alpha > EMPTY_ALPHA_MAX {
                x0 = x0.min(x);
                x1 = x1.max(x);
                y0 = y0.min(y);
                y1 = y1.max(y);
                found = true;
            }
        }
    }

    if !found {
        return None;
    }

    // Inclusive corners -> rect
    Some(Rect::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

/// Crop the bitmap to its content bounds.
///
/// A bitmap with no visible content is returned unchanged; that is a defined
/// degenerate state, not an error. A single visible pixel crops to a 1x1
/// bitmap.
pub fn autocrop(bitmap: Bitmap) -> Bitmap {
    match content_bounds(&bitmap) {
        Some(bounds) => bitmap.crop(bounds),
        None => bitmap,
    }
}
