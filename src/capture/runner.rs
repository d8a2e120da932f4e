//! The packing run: capture every image and data file for one language and
//! zip the staging tree.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::capture::CaptureSession;
use crate::codec;
use crate::error::PackError;
use crate::models::{DataFileEntry, DataFileKind, ImageEntry, PackConfig};
use crate::packaging::archive_dir;

/// What a packing run produced.
#[derive(Debug)]
pub struct PackSummary {
    /// Language code reported by the page.
    pub lang: String,
    /// Images captured successfully.
    pub images: usize,
    /// Images that failed to capture or finalize.
    pub failed_images: usize,
    /// Data files written.
    pub data_files: usize,
    /// Path of the zip archive.
    pub archive: PathBuf,
}

/// Capture and pack one localization CSV.
///
/// Failures of a single image are logged and skipped so one broken capture
/// does not abort the whole language pack; every other failure (protocol,
/// data files, archiving) is fatal to the run.
pub fn run_pack(config: &PackConfig) -> Result<PackSummary, PackError> {
    let csv = fs::read_to_string(&config.csv_path)?;

    let staging = config.staging_dir();
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;

    tracing::info!(url = %config.tool_url, "Opening loc tool page");
    let session = CaptureSession::launch(&config.tool_url)?;

    tracing::info!(csv = %config.csv_path.display(), "Loading localization CSV");
    session.load_manifest(&csv)?;

    // The page pulls sprites and fonts referenced by the CSV; capture must
    // not start until they are all in.
    session.wait_for_resources(config.resource_timeout)?;

    let manifest = session.begin(config.scale, config.make_fonts)?;
    tracing::info!(
        lang = %manifest.lang,
        images = manifest.images.len(),
        data_files = manifest.data_files.len(),
        "Capture ready"
    );

    write_data_files(&session, &staging, &manifest.data_files)?;
    let failed_images = capture_images(&session, &staging, config.scale, &manifest.images);

    let archive = config.output_dir.join(format!("{}.zip", manifest.lang));
    tracing::info!(archive = %archive.display(), "Zipping");
    archive_dir(&staging, &archive)?;

    if failed_images > 0 {
        tracing::warn!(
            failed = failed_images,
            "Some images failed; the archive is missing them"
        );
    }

    Ok(PackSummary {
        lang: manifest.lang,
        images: manifest.images.len() - failed_images,
        failed_images,
        data_files: manifest.data_files.len(),
        archive,
    })
}

fn write_data_files(
    session: &CaptureSession,
    staging: &Path,
    entries: &[DataFileEntry],
) -> Result<(), PackError> {
    for (i, entry) in entries.iter().enumerate() {
        tracing::info!("[Data  {:>3}/{}] {}", i + 1, entries.len(), entry.filename);

        let target = staging.join(&entry.filename);
        match entry.data_type {
            DataFileKind::Url => match session.fetch_binary(&entry.contents)? {
                Some(bytes) => write_guaranteed(&target, &bytes)?,
                None => {
                    tracing::warn!(url = %entry.contents, "Resource not found, skipping data file")
                }
            },
            DataFileKind::DataUrl => {
                let payload = entry.contents.split(',').nth(1).ok_or_else(|| {
                    PackError::Protocol(format!("malformed data URL for {}", entry.filename))
                })?;
                let bytes = BASE64.decode(payload).map_err(|e| {
                    PackError::Protocol(format!("invalid data URL for {}: {}", entry.filename, e))
                })?;
                write_guaranteed(&target, &bytes)?;
            }
            DataFileKind::Text => write_guaranteed(&target, entry.contents.as_bytes())?,
        }
    }
    Ok(())
}

/// Capture and finalize every image; returns the number of failures.
fn capture_images(
    session: &CaptureSession,
    staging: &Path,
    scale: u32,
    entries: &[ImageEntry],
) -> usize {
    let mut failed = 0;

    for (i, entry) in entries.iter().enumerate() {
        tracing::info!(
            "[Image {:>3}/{}] {} ({}x{}){}{}",
            i + 1,
            entries.len(),
            entry.filename,
            entry.w,
            entry.h,
            if entry.quantize_rects.is_empty() { "" } else { " PAL" },
            if entry.baked { " BAKED" } else { "" },
        );

        if let Err(error) = capture_one(session, staging, scale, entry) {
            tracing::error!(image = %entry.filename, %error, "Image failed, continuing batch");
            failed += 1;
        }
    }

    failed
}

fn capture_one(
    session: &CaptureSession,
    staging: &Path,
    scale: u32,
    entry: &ImageEntry,
) -> Result<(), PackError> {
    let finalizer = entry.finalizer()?;

    session.isolate(&entry.id)?;
    let png_bytes = session.screenshot(scale * entry.w, scale * entry.h)?;

    let capture = codec::decode_png(&png_bytes)?;
    let sprite = finalizer
        .finalize(capture)
        .map_err(|source| PackError::Finalize {
            filename: entry.filename.clone(),
            source,
        })?;

    codec::write_png(&staging.join(&entry.filename), &sprite)
}

fn write_guaranteed(path: &Path, bytes: &[u8]) -> Result<(), PackError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}
