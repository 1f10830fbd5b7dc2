use luna_refs::RefError;
use luna_store::StoreError;
use thiserror::Error;

/// Errors raised while opening or configuring the database file.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite rejected an operation.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The connection mutex was poisoned by a panicking thread.
    #[error("database connection lock poisoned")]
    LockPoisoned,
}

impl From<SqliteError> for StoreError {
    fn from(err: SqliteError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<SqliteError> for RefError {
    fn from(err: SqliteError) -> Self {
        RefError::Backend(err.to_string())
    }
}
