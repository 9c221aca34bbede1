//! Screenshot persistence.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::{ImageFormat, RgbImage};

use crate::types::Capture;

/// `<dir>/<unix_millis>.bmp`
pub fn screenshot_path(dir: &Path, unix_millis: u128) -> PathBuf {
    dir.join(format!("{}.bmp", unix_millis))
}

/// Repack a BGRA capture into tightly packed RGB rows.
pub fn to_rgb(capture: &Capture) -> Result<RgbImage> {
    if capture.is_empty() {
        bail!("empty capture");
    }
    let stride = capture.bytes_per_row as usize;
    let (w, h) = (capture.width as usize, capture.height as usize);
    if stride < w * 4 || capture.data.len() < stride * h {
        bail!(
            "capture buffer too small: {} bytes for {}x{} (stride {})",
            capture.data.len(), w, h, stride
        );
    }

    let mut rgb = Vec::with_capacity(w * h * 3);
    for row in capture.data.chunks_exact(stride).take(h) {
        for px in row[..w * 4].chunks_exact(4) {
            rgb.extend_from_slice(&[px[2], px[1], px[0]]);
        }
    }

    RgbImage::from_raw(capture.width, capture.height, rgb)
        .context("pixel buffer does not match dimensions")
}

/// Write a capture as a BMP file, creating the parent directory if needed.
pub fn save_bitmap(path: &Path, capture: &Capture) -> Result<()> {
    let img = to_rgb(capture)?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    img.save_with_format(path, ImageFormat::Bmp)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
