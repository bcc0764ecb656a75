//! Image and history I/O.
//!
//! Everything is converted to single-channel 8-bit on load; the painter
//! itself never sees colour.

use std::fs;
use std::path::{Path, PathBuf};

use image::GrayImage;
use log::debug;

use crate::compute::{Brush, Canvas, SamplingField};
use crate::error::PaintError;
use crate::schema::PaintHistory;

fn load_luma(path: &Path) -> Result<GrayImage, PaintError> {
    let image = image::open(path)?.to_luma8();
    debug!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Load an image as a grayscale canvas.
pub fn load_canvas(path: impl AsRef<Path>) -> Result<Canvas, PaintError> {
    let image = load_luma(path.as_ref())?;
    let (width, height) = (image.width() as usize, image.height() as usize);
    Canvas::from_raw(width, height, image.into_raw()).ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, "pixel buffer size mismatch").into()
    })
}

/// Load a brush template, scaled so its longest side is `brush_size` pixels.
///
/// Luma is used as alpha: white paints fully, black not at all.
pub fn load_brush(path: impl AsRef<Path>, brush_size: usize) -> Result<Brush, PaintError> {
    let template = load_luma(path.as_ref())?;
    Ok(Brush::with_size(template, brush_size)?)
}

/// Load an external sampling mask; brighter pixels attract more strokes.
pub fn load_mask(path: impl AsRef<Path>) -> Result<SamplingField, PaintError> {
    let weights = load_canvas(path)?.to_grid();
    Ok(SamplingField::new(weights)?)
}

/// Save a canvas; the format follows the file extension.
pub fn save_canvas(canvas: &Canvas, path: impl AsRef<Path>) -> Result<(), PaintError> {
    let image = GrayImage::from_raw(
        canvas.width as u32,
        canvas.height as u32,
        canvas.data.clone(),
    )
    .ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "canvas size mismatch")
    })?;
    image.save(path.as_ref())?;
    Ok(())
}

/// Write every buffered canvas to `dir` as `000000.png`, `000001.png`, ...
pub fn export_buffer(dir: impl AsRef<Path>, buffer: &[Canvas]) -> Result<Vec<PathBuf>, PaintError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    buffer
        .iter()
        .enumerate()
        .map(|(i, canvas)| {
            let path = dir.join(format!("{:06}.png", i));
            save_canvas(canvas, &path)?;
            Ok(path)
        })
        .collect()
}

/// Write stage sampling masks to `dir` as `mask_000002.png`, ..., numbered by
/// the buffer index of the stage that used them.
pub fn export_masks(
    dir: impl AsRef<Path>,
    masks: &[(usize, Canvas)],
) -> Result<Vec<PathBuf>, PaintError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    masks
        .iter()
        .map(|(index, mask)| {
            let path = dir.join(format!("mask_{:06}.png", index));
            save_canvas(mask, &path)?;
            Ok(path)
        })
        .collect()
}

/// Write the per-stage history as pretty JSON.
pub fn save_history(history: &PaintHistory, path: impl AsRef<Path>) -> Result<(), PaintError> {
    let json = serde_json::to_string_pretty(history)?;
    fs::write(path, json)?;
    Ok(())
}
