use std::sync::Arc;

use luna_crypto::KeyMaterial;
use luna_records::{RecordResult, RecordStore, Scheme};
use luna_refs::{names, RefStore};
use luna_store::ObjectStore;
use luna_types::{ContentId, Index, VersionObject};

/// Read-only view of a store written by the legacy passphrase scheme.
pub struct LegacyAdapter {
    store: RecordStore,
}

impl LegacyAdapter {
    pub fn new(objects: Arc<dyn ObjectStore>, refs: Arc<dyn RefStore>, passphrase: &str) -> Self {
        Self {
            store: RecordStore::new(
                objects,
                refs,
                Scheme::Legacy,
                KeyMaterial::passphrase(passphrase),
            ),
        }
    }

    /// Returns `true` if the database carries a legacy index pointer.
    pub async fn detect(refs: &dyn RefStore) -> RecordResult<bool> {
        Ok(refs.exists(names::LEGACY_INDEX).await?)
    }

    /// The legacy index. A wrong passphrase fails authentication here,
    /// before anything has been written.
    pub async fn old_get_index(&self) -> RecordResult<Index> {
        self.store.get_index().await
    }

    pub async fn old_get_version_object(&self, cid: &ContentId) -> RecordResult<Option<VersionObject>> {
        self.store.get_version_object(cid).await
    }

    /// A legacy chain, newest first.
    pub async fn old_chain(&self, head: ContentId) -> RecordResult<Vec<VersionObject>> {
        Ok(self
            .store
            .walk_chain(head)
            .await?
            .into_iter()
            .map(|(_, version)| version)
            .collect())
    }
}
