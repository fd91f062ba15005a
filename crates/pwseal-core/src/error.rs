//! Error types for pwseal-core

use thiserror::Error;

/// Result type alias for envelope operations
pub type Result<T> = std::result::Result<T, SealError>;

/// Envelope error types
#[derive(Error, Debug)]
pub enum SealError {
    #[error("Secure random source unavailable: {0}")]
    RandomSource(String),

    #[error("Key derivation failed: {0}")]
    Derivation(String),

    #[error("Cipher construction failed: {0}")]
    CipherConstruction(String),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Wrong password, corrupted ciphertext and tampering all land here.
    #[error("Envelope authentication failed")]
    Authentication,

    #[error("Decrypted data is not valid UTF-8")]
    InvalidUtf8,

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

impl SealError {
    /// True when the envelope decoded but did not authenticate
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, SealError::Authentication)
    }

    /// True when the input was not a structurally valid envelope
    pub fn is_malformed(&self) -> bool {
        matches!(self, SealError::MalformedEnvelope(_))
    }
}
