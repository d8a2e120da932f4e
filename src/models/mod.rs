mod config;
mod manifest;

pub use config::{PackConfig, DEFAULT_TOOL_URL};
pub use manifest::{
    CaptureManifest, ColorEntry, DataFileEntry, DataFileKind, ImageEntry, QuantizeRectEntry,
    RectEntry,
};
