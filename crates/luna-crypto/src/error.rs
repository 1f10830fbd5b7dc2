/// Errors from envelope and key operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    /// The authentication tag did not verify. This is the only signal for a
    /// wrong passphrase or key; it never says which part of the envelope
    /// was at fault.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Encryption itself failed (e.g. payload too large for the cipher).
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Supplied key bytes are not key-grade material.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
}

/// Result alias for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
