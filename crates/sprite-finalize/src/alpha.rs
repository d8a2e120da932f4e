//! Sentinel-color alpha decoding.
//!
//! The capture tool renders into an opaque surface, so it encodes
//! transparency as two reserved RGB values instead of an alpha channel:
//! magenta for fully transparent pixels and dark magenta for the standard
//! half-opacity drop shadow. This stage rewrites those sentinels into true
//! alpha. Matching is byte-exact on RGB, never distance-based: a legitimate
//! UI color one step away from magenta must pass through untouched.

use crate::bitmap::Bitmap;

/// RGB reserved for fully transparent pixels.
pub const TRANSPARENT_KEY: [u8; 3] = [255, 0, 255];

/// RGB reserved for the drop-shadow color.
pub const SHADOW_KEY: [u8; 3] = [127, 0, 127];

/// Alpha written for decoded shadow pixels (half opacity).
pub const SHADOW_ALPHA: u8 = 127;

/// Rewrite sentinel colors into true alpha, in place.
///
/// - RGB exactly [`TRANSPARENT_KEY`]: alpha becomes 0, RGB is left as-is
///   (irrelevant once fully transparent).
/// - RGB exactly [`SHADOW_KEY`]: pixel becomes black at [`SHADOW_ALPHA`].
/// - Everything else passes through unmodified, existing alpha included.
///
/// Idempotent: a decoded shadow pixel is black, not dark magenta, so a
/// second pass finds no sentinels to rewrite. (A decoded transparent pixel
/// still carries magenta RGB and is rewritten to the same bytes.)
pub fn decode_sentinels(bitmap: &mut Bitmap) {
    for pixel in bitmap.data_mut().chunks_exact_mut(4) {
        let rgb = [pixel[0], pixel[1], pixel[2]];
        if rgb == TRANSPARENT_KEY {
            pixel[3] = 0;
        } else if rgb == SHADOW_KEY {
            pixel[0] = 0;
            pixel[1] = 0;
            pixel[2] = 0;
            pixel[3] = SHADOW_ALPHA;
        }
    }
}
