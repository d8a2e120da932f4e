use sprite_finalize::FinalizeError;
use thiserror::Error;

/// Errors from the capture-and-pack run.
///
/// Per-image variants carry the offending filename so one bad capture can
/// be reported precisely while the rest of the batch continues.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Capture protocol error: {0}")]
    Protocol(String),

    #[error("Manifest decode error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("PNG decode error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("Unsupported capture color type: {0}")]
    UnsupportedColorType(String),

    #[error("Finalize error for {filename}: {source}")]
    Finalize {
        filename: String,
        #[source]
        source: FinalizeError,
    },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
