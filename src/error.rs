//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, GDAL, and JSON errors, and provides semantic variants
//! for missing bands, invalid configuration, and output failures.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] crate::io::GdalError),

    #[error("Input raster not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Required band {band} not found in band descriptions. Available: {available}")]
    MissingBand { band: String, available: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Preview error: {0}")]
    Preview(String),

    #[error("Display error: {0}")]
    Display(String),

    #[error("Processing error: {0}")]
    Processing(String),
}
