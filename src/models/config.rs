use std::path::PathBuf;
use std::time::Duration;

/// Public instance of the loc tool, used when no URL is given.
pub const DEFAULT_TOOL_URL: &str = "https://paperspleaseloc.github.io";

/// Configuration for one packing run.
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Input localization CSV, fed verbatim to the page-side loader.
    pub csv_path: PathBuf,

    /// URL of the loc tool page to drive.
    pub tool_url: String,

    /// Directory receiving the staging tree and the final zip.
    pub output_dir: PathBuf,

    /// Capture supersampling factor; elements are screenshotted at
    /// `scale` times their target size and downscaled by the pipeline.
    pub scale: u32,

    /// Ask the page to also emit font data files.
    pub make_fonts: bool,

    /// How long to wait for page resources before giving up.
    pub resource_timeout: Duration,
}

impl PackConfig {
    /// Language-pack code, derived from the CSV file stem.
    pub fn code(&self) -> String {
        self.csv_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_string())
    }

    /// Staging directory for captured files before zipping.
    pub fn staging_dir(&self) -> PathBuf {
        self.output_dir.join(format!("__tmp__{}", self.code()))
    }
}
