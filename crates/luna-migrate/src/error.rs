use std::path::PathBuf;

use luna_records::RecordError;
use thiserror::Error;

use crate::verify::Mismatch;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("failed to back up database to {}: {source}", path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rebuilt store differs from the legacy one. The new index and the
    /// backup are left in place for inspection.
    #[error(
        "migration verification failed with {} mismatch(es); backup kept at {}",
        mismatches.len(),
        backup.display()
    )]
    VerificationFailed {
        mismatches: Vec<Mismatch>,
        backup: PathBuf,
    },
}

impl MigrationError {
    /// Returns `true` if the legacy store rejected the passphrase.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::Record(RecordError::AuthenticationFailed))
    }
}

pub type MigrationResult<T> = Result<T, MigrationError>;
