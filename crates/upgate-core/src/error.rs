//! Error types for the `Upgate` core library.

use thiserror::Error;

/// Result type alias using `Upgate` Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for `Upgate` operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Version string rejected by the strict parser
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid_version(version: &str, reason: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.to_string(),
            reason: reason.into(),
        }
    }
}
