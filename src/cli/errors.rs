use std::path::PathBuf;

use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error(transparent)]
    Detection(#[from] penguin_cie::Error),
}
