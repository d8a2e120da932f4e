//! Public API for the sprite-finalize crate.
//!
//! This module provides the high-level API: the [`SpriteFinalizer`] builder
//! and the [`FinalizeError`] unified error type.

mod builder;
mod error;

pub use builder::SpriteFinalizer;
pub use error::FinalizeError;
