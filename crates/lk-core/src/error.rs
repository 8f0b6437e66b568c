use thiserror::Error;

pub type LkResult<T> = Result<T, LkError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LkError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArgument { what: String },

    #[error("Invalid system: {what}")]
    InvalidSystem { what: &'static str },
}

impl LkError {
    pub(crate) fn invalid_arg(what: impl Into<String>) -> Self {
        LkError::InvalidArgument { what: what.into() }
    }
}
