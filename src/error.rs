//! Crate-level error type.

use crate::compute::SamplingError;
use crate::schema::ConfigError;

/// Errors surfaced by painting and its I/O helpers.
#[derive(Debug, thiserror::Error)]
pub enum PaintError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Sampling failed: {0}")]
    Sampling(#[from] SamplingError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
