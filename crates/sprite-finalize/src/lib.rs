//! sprite-finalize: screenshot-to-sprite finalization for localized UI assets
//!
//! This library turns raw UI captures into game-ready sprites. The capture
//! side renders localized UI elements in a browser at an integer multiple of
//! the final sprite size and hands the decoded RGBA bitmap to this crate,
//! which applies the pixel-level transforms: sentinel-color alpha decoding,
//! content-bounds autocropping, region-scoped palette quantization in CIE-LAB
//! space, and block-mode (majority color) downscaling.
//!
//! # Quick Start
//!
//! The [`SpriteFinalizer`] builder is the primary entry point:
//!
//! ```
//! use sprite_finalize::{Bitmap, Palette, Rect, SpriteFinalizer};
//!
//! let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]]).unwrap();
//!
//! let finalizer = SpriteFinalizer::new(64, 32)
//!     .autocrop(false)
//!     .quantize_region(Rect::new(0, 0, 64, 32), palette);
//!
//! let capture = Bitmap::new(128, 64); // captured at 2x
//! let sprite = finalizer.finalize(capture).unwrap();
//! assert_eq!(sprite.width(), 64);
//! ```
//!
//! # Pipeline Overview
//!
//! ```text
//! RGBA capture            (from the browser, at an integer multiple
//!     |                    of the target sprite size)
//!     v
//! [Autocrop]              (optional: trim to alpha > 1 content bounds;
//!     |                    must see pre-decoding alpha)
//!     v
//! [Region quantize]       (per declared rect, in order: snap pixels to
//!     |                    the rect's palette, nearest in LAB)
//!     v
//! [Alpha decode]          (magenta sentinel -> transparent,
//!     |                    dark magenta sentinel -> half-black shadow)
//!     v
//! [Block downscale]       (when capture > target: mode filter over each
//!     |                    step x step block)
//!     v
//! finalized sprite
//! ```
//!
//! The stage order is a correctness requirement, not a convention. Autocrop
//! runs first because it fixes the geometry every later stage sees, and it
//! inspects the capture's pre-decoding alpha. Sentinel decoding runs after
//! quantization so that a palette may itself contain a sentinel color: a
//! region snapped to magenta still decodes to transparency. The downscale
//! runs last, over fully decoded RGBA values, so transparent and opaque
//! pixels with equal RGB stay distinct in the block tally.
//!
//! # Why LAB, Why a Mode Filter
//!
//! Palette snapping measures distance in CIE-LAB, where Euclidean distance
//! approximates perceived color difference. Raw RGB distance over-weights
//! channels the eye barely distinguishes and produces visible banding when
//! a captured gradient collapses onto a small in-game palette; the same
//! reduction in LAB picks the entries a human would pick.
//!
//! Downscaling takes the most frequent exact RGBA value per block instead
//! of averaging. Captures are supersampled by an integer factor precisely
//! so that every output pixel has a well-defined majority; averaging would
//! invent intermediate colors at every hard edge and turn crisp pixel art
//! into blur.
//!
//! Both the palette search and the block tally are order-dependent by
//! contract: the first palette entry at minimal distance wins, and the
//! first RGBA value to reach the maximum count in a row-major block scan
//! wins. Output is bit-for-bit deterministic for a given input.
//!
//! # Ownership
//!
//! A [`Bitmap`] is exclusively owned by one pipeline stage at a time.
//! [`SpriteFinalizer::finalize`] consumes the capture and returns a new
//! owned bitmap; in-place stages mutate through `&mut`. Distinct captures
//! share nothing and can be finalized on as many threads as desired.

pub mod alpha;
pub mod api;
pub mod autocrop;
pub mod bitmap;
pub mod color;
pub mod downscale;
pub mod palette;
pub mod quantize;


pub use alpha::{decode_sentinels, SHADOW_ALPHA, SHADOW_KEY, TRANSPARENT_KEY};
pub use api::{FinalizeError, SpriteFinalizer};
pub use autocrop::{autocrop, content_bounds};
pub use bitmap::{Bitmap, Rect};
pub use color::{rgb_to_lab, Lab};
pub use downscale::downscale;
pub use palette::{parse_hex_color, Palette, PaletteError, ParseColorError};
pub use quantize::{quantize_region, QuantizeRegion};
