//! Error types for model construction.

use lk_core::LkError;
use thiserror::Error;

/// Result type for model construction.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while building plant or controller models.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// Parameter combination that is mathematically undefined.
    #[error("Domain error: {param} = {value} ({reason})")]
    Domain {
        param: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Malformed call shape, e.g. an unsupported approximation order.
    #[error("Invalid argument: {what}")]
    InvalidArgument { what: String },

    /// Failure in the underlying transfer-function algebra.
    #[error(transparent)]
    Core(#[from] LkError),
}

/// Reject a parameter that must not be zero (it is inverted somewhere).
pub(crate) fn ensure_nonzero(value: f64, param: &'static str) -> ModelResult<f64> {
    let value = lk_core::ensure_finite(value, param)?;
    if value == 0.0 {
        return Err(ModelError::Domain {
            param,
            value,
            reason: "must be non-zero",
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonzero_guard() {
        assert!(ensure_nonzero(0.5, "ti").is_ok());
        assert!(matches!(
            ensure_nonzero(0.0, "ti"),
            Err(ModelError::Domain { param: "ti", .. })
        ));
        assert!(matches!(
            ensure_nonzero(f64::NAN, "ti"),
            Err(ModelError::Core(LkError::NonFinite { .. }))
        ));
    }

    #[test]
    fn domain_message_names_parameter() {
        let err = ModelError::Domain {
            param: "ki",
            value: 0.0,
            reason: "must be non-zero",
        };
        assert_eq!(err.to_string(), "Domain error: ki = 0 (must be non-zero)");
    }
}
