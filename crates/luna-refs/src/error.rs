//! Error types for pointer operations.

use thiserror::Error;

/// Errors that can occur during pointer operations.
#[derive(Debug, Error)]
pub enum RefError {
    /// The pointer name is invalid.
    #[error("invalid pointer name: {name}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A stored pointer target could not be decoded.
    #[error("corrupt pointer {name}: {reason}")]
    CorruptTarget { name: String, reason: String },

    /// Backend failure (lock poisoning, database error).
    #[error("pointer backend error: {0}")]
    Backend(String),

    /// I/O error during file-based pointer operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for pointer operations.
pub type Result<T> = std::result::Result<T, RefError>;
