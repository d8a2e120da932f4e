//! PNG codec between capture bytes and pipeline bitmaps.
//!
//! Screenshots arrive as PNG bytes from the browser and finalized sprites
//! leave as PNG files on disk; everything in between is an RGBA8
//! [`Bitmap`]. Encoding uses fast settings and lets oxipng re-compress the
//! result, the same encode-then-optimize split the renderer side of this
//! toolchain uses.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use sprite_finalize::Bitmap;

use crate::error::PackError;

/// Decode PNG bytes into an RGBA8 bitmap.
///
/// 16-bit and palette sources are normalized to 8-bit; RGB and grayscale
/// sources gain an opaque alpha channel. Anything else is rejected.
pub fn decode_png(bytes: &[u8]) -> Result<Bitmap, PackError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());

    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let data = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => {
            let mut rgba = Vec::with_capacity(buf.len() / 3 * 4);
            for rgb in buf.chunks_exact(3) {
                rgba.extend_from_slice(rgb);
                rgba.push(255);
            }
            rgba
        }
        png::ColorType::GrayscaleAlpha => {
            let mut rgba = Vec::with_capacity(buf.len() * 2);
            for ga in buf.chunks_exact(2) {
                rgba.extend_from_slice(&[ga[0], ga[0], ga[0], ga[1]]);
            }
            rgba
        }
        png::ColorType::Grayscale => {
            let mut rgba = Vec::with_capacity(buf.len() * 4);
            for &g in &buf {
                rgba.extend_from_slice(&[g, g, g, 255]);
            }
            rgba
        }
        other => {
            return Err(PackError::UnsupportedColorType(format!("{:?}", other)));
        }
    };

    Ok(Bitmap::from_rgba(info.width, info.height, data))
}

/// Encode a bitmap as an RGBA8 PNG.
pub fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>, PackError> {
    let mut buf = Cursor::new(Vec::new());
    {
        // Fast settings -- oxipng re-compresses optimally below.
        let mut encoder = png::Encoder::new(&mut buf, bitmap.width(), bitmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(bitmap.data())?;
    }
    let png_bytes = buf.into_inner();

    // optimize_alpha would rewrite RGB under transparent pixels, which the
    // sentinel contract forbids.
    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes);

    Ok(optimized)
}

/// Read a PNG file into a bitmap.
pub fn read_png(path: &Path) -> Result<Bitmap, PackError> {
    let bytes = fs::read(path)?;
    decode_png(&bytes)
}

/// Write a bitmap as a PNG file, creating parent directories as needed.
pub fn write_png(path: &Path, bitmap: &Bitmap) -> Result<(), PackError> {
    let bytes = encode_png(bitmap)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}
