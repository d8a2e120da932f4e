//! Capture-protocol manifest types.
//!
//! `$.capture.begin()` answers with a JSON manifest describing every image
//! and data file the page wants packed. These types mirror that payload
//! (camelCase on the wire) and convert image entries into configured
//! [`SpriteFinalizer`]s.

use serde::Deserialize;
use sprite_finalize::{parse_hex_color, Palette, Rect, SpriteFinalizer};

use crate::error::PackError;

/// Everything the page wants packed for one language.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureManifest {
    /// Language code; also names the output archive.
    pub lang: String,
    pub images: Vec<ImageEntry>,
    #[serde(default)]
    pub data_files: Vec<DataFileEntry>,
}

/// One UI element to capture and finalize.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEntry {
    /// DOM id handed to `$.capture.isolate`.
    pub id: String,

    /// Output path inside the archive, forward slashes.
    pub filename: String,

    /// Target sprite width in pixels.
    pub w: u32,

    /// Target sprite height in pixels.
    pub h: u32,

    #[serde(default)]
    pub quantize_rects: Vec<QuantizeRectEntry>,

    #[serde(default)]
    pub want_auto_crop: bool,

    /// Pre-rendered on the page rather than styled live. Only logged.
    #[serde(default)]
    pub baked: bool,
}

impl ImageEntry {
    /// Build the finalizer configured for this image.
    ///
    /// # Errors
    ///
    /// [`PackError::Protocol`] for zero target dimensions,
    /// [`PackError::Finalize`] for an invalid palette; both name the image.
    pub fn finalizer(&self) -> Result<SpriteFinalizer, PackError> {
        if self.w == 0 || self.h == 0 {
            return Err(PackError::Protocol(format!(
                "image {} has zero target size {}x{}",
                self.id, self.w, self.h
            )));
        }

        let mut finalizer =
            SpriteFinalizer::new(self.w, self.h).autocrop(self.want_auto_crop);
        for entry in &self.quantize_rects {
            let palette = entry.palette().map_err(|source| PackError::Finalize {
                filename: self.filename.clone(),
                source,
            })?;
            finalizer = finalizer.quantize_region(entry.rect.into(), palette);
        }
        Ok(finalizer)
    }
}

/// A quantization request: rect in target coordinates plus its palette.
#[derive(Debug, Clone, Deserialize)]
pub struct QuantizeRectEntry {
    pub rect: RectEntry,
    pub colors: Vec<ColorEntry>,
}

impl QuantizeRectEntry {
    /// Validate and convert the color list into a palette.
    pub fn palette(&self) -> Result<Palette, sprite_finalize::FinalizeError> {
        let colors = self
            .colors
            .iter()
            .map(ColorEntry::to_rgb)
            .collect::<Result<Vec<_>, _>>()
            .map_err(sprite_finalize::PaletteError::from)?;
        Ok(Palette::new(&colors)?)
    }
}

/// Wire form of a rectangle.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RectEntry {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<RectEntry> for Rect {
    fn from(entry: RectEntry) -> Self {
        Rect::new(entry.x, entry.y, entry.width, entry.height)
    }
}

/// A palette color: `[r, g, b]` from the page, `"#RRGGBB"` in hand-written
/// region files.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ColorEntry {
    Rgb([u8; 3]),
    Hex(String),
}

impl ColorEntry {
    pub fn to_rgb(&self) -> Result<[u8; 3], sprite_finalize::ParseColorError> {
        match self {
            ColorEntry::Rgb(rgb) => Ok(*rgb),
            ColorEntry::Hex(hex) => parse_hex_color(hex),
        }
    }
}

/// A non-image file the page wants written into the pack.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFileEntry {
    pub filename: String,

    #[serde(default)]
    pub data_type: DataFileKind,

    /// Meaning depends on `data_type`: a URL to fetch, a data URL to
    /// decode, or literal text.
    pub contents: String,
}

/// How a data file's `contents` field is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum DataFileKind {
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "dataURL")]
    DataUrl,
    #[default]
    #[serde(other)]
    Text,
}
