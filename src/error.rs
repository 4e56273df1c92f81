//! Error types shared by the clustering engine.

use thiserror::Error;

/// Errors returned by engine operations.
///
/// Every variant is recoverable: a failed call leaves the engine exactly as
/// it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Caller-supplied data was empty or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown initialization method, or a `k` the dataset cannot satisfy.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A clustering operation was requested before any data was set.
    #[error("No data has been set; call set_data first")]
    NotReady,
}

impl Error {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
