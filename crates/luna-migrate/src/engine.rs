use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use luna_records::{Keyring, RecordStore, Scheme};
use luna_refs::RefStore;
use luna_store::ObjectStore;
use luna_types::{Index, IndexValue, VersionObject};
use tracing::{info, warn};

use crate::error::{MigrationError, MigrationResult};
use crate::legacy::LegacyAdapter;
use crate::verify::verify_migration;

/// Result of a successful [`Migrator::migrate`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// A keyring already exists; nothing was done.
    AlreadyMigrated,
    /// The legacy index is absent or empty; nothing was done.
    NothingToMigrate,
    Migrated(MigrationReport),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrationReport {
    /// Copy of the database taken before the first write.
    pub backup: PathBuf,
    pub entries: usize,
    pub versions: usize,
}

/// `<db_path>.bak`.
pub fn backup_path(db_path: &Path) -> PathBuf {
    let mut name = OsString::from(db_path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

/// Migration engine over one database's stores.
pub struct Migrator {
    objects: Arc<dyn ObjectStore>,
    refs: Arc<dyn RefStore>,
}

impl Migrator {
    pub fn new(objects: Arc<dyn ObjectStore>, refs: Arc<dyn RefStore>) -> Self {
        Self { objects, refs }
    }

    /// Move every legacy entry, with its full history, to the keyring
    /// scheme.
    ///
    /// `db_path` is the file backing the stores; it is copied to its `.bak`
    /// sibling before anything is written. Safe to call again after
    /// success. Not transactional after the backup: an interrupted run is
    /// recovered from the `.bak` file.
    pub async fn migrate(&self, db_path: &Path, passphrase: &str) -> MigrationResult<MigrationOutcome> {
        let keyring = Keyring::new(self.objects.clone(), self.refs.clone());
        if keyring.exists().await? {
            return Ok(MigrationOutcome::AlreadyMigrated);
        }

        let legacy = LegacyAdapter::new(self.objects.clone(), self.refs.clone(), passphrase);
        let old_index = legacy.old_get_index().await?;
        if old_index.is_empty() {
            return Ok(MigrationOutcome::NothingToMigrate);
        }

        let backup = backup_path(db_path);
        tokio::fs::copy(db_path, &backup)
            .await
            .map_err(|source| MigrationError::Backup {
                path: backup.clone(),
                source,
            })?;
        info!(backup = %backup.display(), entries = old_index.len(), "backup made, beginning migration");

        let key = keyring.create(passphrase).await?;
        let store = RecordStore::new(self.objects.clone(), self.refs.clone(), Scheme::Keyring, key.clone());

        let mut new_index = Index::new();
        let mut versions = 0;
        for (id, old) in &old_index {
            let mut stack: Vec<VersionObject> = legacy.old_chain(old.head).await?;
            if stack.is_empty() {
                warn!(id = %id, head = %old.head, "legacy head unreadable, entry skipped");
                continue;
            }

            // The chain is newest first, so popping yields the oldest.
            let mut prev = None;
            while let Some(version) = stack.pop() {
                let cid = store
                    .put_version_object(&VersionObject::new(prev, version.props))
                    .await?;
                prev = Some(cid);
                versions += 1;
            }
            if let Some(head) = prev {
                new_index.insert(id.clone(), IndexValue::new(old.added.clone(), head));
            }
        }

        store.save_index(Some(new_index)).await?;
        info!(entries = old_index.len(), versions, "migration complete, verifying");

        // A fresh session so verification reads back what was stored.
        let fresh = RecordStore::new(self.objects.clone(), self.refs.clone(), Scheme::Keyring, key);
        let mismatches = verify_migration(&old_index, &legacy, &fresh).await?;
        if !mismatches.is_empty() {
            return Err(MigrationError::VerificationFailed { mismatches, backup });
        }

        info!("migration verified");
        Ok(MigrationOutcome::Migrated(MigrationReport {
            backup,
            entries: old_index.len(),
            versions,
        }))
    }
}
