//! Color space conversion.
//!
//! The pipeline needs exactly one conversion: 8-bit sRGB to CIE-LAB, used as
//! the ordering function for nearest-palette-color search. LAB values are
//! transient; nothing in the crate stores or outputs them.

mod lab;

pub use lab::{rgb_to_lab, Lab};
