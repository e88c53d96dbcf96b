//! Signing error types.

/// Errors from signing and verification.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("Signature does not match payload")]
    SignatureMismatch,
}
