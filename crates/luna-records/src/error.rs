use luna_crypto::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    /// An envelope failed to authenticate under the session key.
    #[error("incorrect database passphrase")]
    AuthenticationFailed,

    #[error("Entry '{0}' does not exist")]
    NotFound(String),

    #[error("Entry '{0}' already exists")]
    AlreadyExists(String),

    #[error("a keyring already exists")]
    KeyringExists,

    /// A pointer or object the database needs is absent.
    #[error("missing object: {0}")]
    MissingObject(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("passphrase unavailable: {0}")]
    Passphrase(String),

    /// The index was saved but some version objects could not be removed.
    #[error("deleted {id} but {} version object(s) could not be removed", failures.len())]
    ChainCleanupFailed { id: String, failures: Vec<String> },
}

impl From<CryptoError> for RecordError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::AuthenticationFailed => Self::AuthenticationFailed,
            other => Self::Crypto(other.to_string()),
        }
    }
}

impl From<luna_store::StoreError> for RecordError {
    fn from(err: luna_store::StoreError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

impl From<luna_refs::RefError> for RecordError {
    fn from(err: luna_refs::RefError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

pub type RecordResult<T> = Result<T, RecordError>;
