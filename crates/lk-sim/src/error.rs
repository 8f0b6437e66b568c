//! Error types for simulation operations.

use lk_core::LkError;
use thiserror::Error;

/// Errors encountered while simulating a transfer function.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArgument { what: String },

    /// The state left the finite range (unstable system or too coarse a step).
    #[error("Simulation diverged at t = {t}")]
    Diverged { t: f64 },

    #[error(transparent)]
    Core(#[from] LkError),
}

pub type SimResult<T> = Result<T, SimError>;

pub(crate) fn invalid_arg(what: impl Into<String>) -> SimError {
    SimError::InvalidArgument { what: what.into() }
}
