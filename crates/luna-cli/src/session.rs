//! Opening a database: legacy migration, keyring unlock or first-run setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use luna_migrate::{LegacyAdapter, MigrationOutcome, Migrator};
use luna_records::{Index, Keyring, PassphraseProvider, PromptReason, RecordStore, Scheme};
use luna_refs::RefStore;
use luna_sqlite::SqliteBackend;
use luna_store::ObjectStore;
use tracing::info;

pub struct Session {
    pub store: RecordStore,
    pub db_path: PathBuf,
    /// Set when this session ran the migration engine.
    pub migration: Option<MigrationOutcome>,
}

/// Open `db_path` and unlock it.
///
/// - no keyring but a legacy index: migrate, then unlock;
/// - keyring: unlock with the passphrase;
/// - neither: choose and confirm a passphrase, create the keyring and save
///   an empty index. An empty legacy database keeps its passphrase instead.
pub async fn open(db_path: &Path, provider: &dyn PassphraseProvider) -> anyhow::Result<Session> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let db = Arc::new(
        SqliteBackend::open(db_path)
            .with_context(|| format!("failed to open database {}", db_path.display()))?,
    );
    let objects: Arc<dyn ObjectStore> = db.clone();
    let refs: Arc<dyn RefStore> = db;
    let keyring = Keyring::new(objects.clone(), refs.clone());

    let mut migration = None;
    // Set once the legacy index has been opened with this passphrase.
    let mut legacy_passphrase = None;
    if !keyring.exists().await? && LegacyAdapter::detect(refs.as_ref()).await? {
        let passphrase = provider.passphrase(PromptReason::Unlock)?;
        let outcome = Migrator::new(objects.clone(), refs.clone())
            .migrate(db_path, &passphrase)
            .await?;
        migration = Some(outcome);
        legacy_passphrase = Some(passphrase);
    }

    let key = if keyring.exists().await? {
        let passphrase = provider.passphrase(PromptReason::Unlock)?;
        keyring.load(&passphrase).await?
    } else {
        let chosen = match legacy_passphrase {
            Some(passphrase) => passphrase,
            None => {
                let chosen = provider.passphrase(PromptReason::Choose)?;
                let confirmed = provider.passphrase(PromptReason::Confirm)?;
                if chosen != confirmed {
                    bail!("Passphrases do not match");
                }
                chosen
            }
        };
        let key = keyring.create(&chosen).await?;
        let store = RecordStore::new(objects.clone(), refs.clone(), Scheme::Keyring, key.clone());
        store.save_index(Some(Index::new())).await?;
        info!(path = %db_path.display(), "initialised new database");
        key
    };

    Ok(Session {
        store: RecordStore::new(objects, refs, Scheme::Keyring, key),
        db_path: db_path.to_path_buf(),
        migration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use luna_migrate::backup_path;
    use luna_records::{
        CachingProvider, KeyMaterial, Props, RecordError, RecordResult, StaticPassphrase,
    };
    use zeroize::Zeroizing;

    struct Mismatched;

    impl PassphraseProvider for Mismatched {
        fn passphrase(&self, reason: PromptReason) -> RecordResult<Zeroizing<String>> {
            Ok(Zeroizing::new(match reason {
                PromptReason::Confirm => "typo".to_string(),
                _ => "pw".to_string(),
            }))
        }
    }

    fn db_in(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("data").join("luna-pass.db")
    }

    #[tokio::test]
    async fn first_run_creates_keyring_and_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = db_in(&dir);

        let session = open(&path, &StaticPassphrase::new("pw")).await.unwrap();
        assert!(session.migration.is_none());
        assert!(session.store.list(None).await.unwrap().is_empty());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn reopen_sees_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = db_in(&dir);
        let provider = StaticPassphrase::new("pw");

        let first = open(&path, &provider).await.unwrap();
        first.store.add("site", Props::new()).await.unwrap();
        drop(first);

        let second = open(&path, &provider).await.unwrap();
        assert_eq!(second.store.list(None).await.unwrap(), vec!["site"]);
    }

    #[tokio::test]
    async fn wrong_passphrase_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = db_in(&dir);
        open(&path, &StaticPassphrase::new("pw")).await.unwrap();

        let err = open(&path, &StaticPassphrase::new("nope")).await.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<RecordError>(),
            Some(RecordError::AuthenticationFailed)
        ));
    }

    #[tokio::test]
    async fn mismatched_confirmation_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = db_in(&dir);

        let err = open(&path, &Mismatched).await.err().unwrap();
        assert_eq!(err.to_string(), "Passphrases do not match");

        let session = open(&path, &StaticPassphrase::new("pw")).await.unwrap();
        assert!(session.store.list(None).await.unwrap().is_empty());
    }

    /// Answers `Unlock` only.
    struct UnlockOnly;

    impl PassphraseProvider for UnlockOnly {
        fn passphrase(&self, reason: PromptReason) -> RecordResult<Zeroizing<String>> {
            match reason {
                PromptReason::Unlock => Ok(Zeroizing::new("pw".to_string())),
                other => Err(RecordError::Passphrase(format!("unexpected prompt: {other:?}"))),
            }
        }
    }

    #[tokio::test]
    async fn empty_legacy_database_keeps_its_passphrase() {
        let dir = tempfile::tempdir().unwrap();
        let path = db_in(&dir);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        {
            let db = Arc::new(SqliteBackend::open(&path).unwrap());
            let legacy = RecordStore::new(
                db.clone(),
                db,
                Scheme::Legacy,
                KeyMaterial::passphrase("pw"),
            );
            legacy.save_index(Some(Index::new())).await.unwrap();
        }

        let session = open(&path, &UnlockOnly).await.unwrap();
        assert_eq!(session.migration, Some(MigrationOutcome::NothingToMigrate));
        assert!(session.store.list(None).await.unwrap().is_empty());

        let again = open(&path, &UnlockOnly).await.unwrap();
        assert!(again.migration.is_none());
    }

    #[tokio::test]
    async fn legacy_database_is_migrated_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = db_in(&dir);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        {
            let db = Arc::new(SqliteBackend::open(&path).unwrap());
            let legacy = RecordStore::new(
                db.clone(),
                db,
                Scheme::Legacy,
                KeyMaterial::passphrase("pw"),
            );
            let mut props = Props::new();
            props.insert("user".into(), "bob".into());
            legacy.add("site", props).await.unwrap();
        }

        let provider = CachingProvider::new(StaticPassphrase::new("pw"));
        let session = open(&path, &provider).await.unwrap();

        assert!(matches!(session.migration, Some(MigrationOutcome::Migrated(_))));
        assert!(backup_path(&path).exists());
        assert_eq!(session.store.get_props("site").await.unwrap()["user"], "bob");

        let again = open(&path, &provider).await.unwrap();
        assert!(again.migration.is_none());
    }
}
