//! Error types for the lk-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the model and simulation
/// crates and provides a unified error interface for front-ends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read loop file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse loop file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Loop validation failed: {0}")]
    Validation(String),

    #[error("Model error: {0}")]
    Model(#[from] lk_models::ModelError),

    #[error("Transfer function error: {0}")]
    Core(#[from] lk_core::LkError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] lk_sim::SimError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for lk-app operations.
pub type AppResult<T> = Result<T, AppError>;
