use thiserror::Error;

/// Errors returned by DPM operations.
///
/// Business outcomes (approved, declined, rejected signature) are never
/// errors; see [`crate::processor::TransactionOutcome`].
#[derive(Debug, Error)]
pub enum DpmError {
    #[error("config error: {0}")]
    ConfigError(String),

    #[error("invalid form: {0}")]
    InvalidForm(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}
