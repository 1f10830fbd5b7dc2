use std::sync::Arc;

use luna_crypto::{open, seal, KeyMaterial};
use luna_refs::{names, RefStore};
use luna_store::{ObjectStore, StoreError, StoredObject};
use luna_types::{ContentId, Index, VersionObject};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::codec::{open_json, seal_json};
use crate::error::{RecordError, RecordResult};
use crate::scheme::Scheme;

/// One session against a record database.
///
/// Owns the session key and the process-scoped index cache. The index is
/// loaded on first use and every operation that changes it holds the cache
/// lock from read to save, so operations within one session are strictly
/// sequential. Nothing coordinates separate processes: the index pointer is
/// last-writer-wins.
pub struct RecordStore {
    pub(crate) objects: Arc<dyn ObjectStore>,
    refs: Arc<dyn RefStore>,
    scheme: Scheme,
    key: KeyMaterial,
    index: Mutex<Option<Index>>,
}

impl RecordStore {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        refs: Arc<dyn RefStore>,
        scheme: Scheme,
        key: KeyMaterial,
    ) -> Self {
        Self {
            objects,
            refs,
            scheme,
            key,
            index: Mutex::new(None),
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    // ---- Index ----

    /// The cached index, loading it on first access.
    ///
    /// Callers that change the index edit a copy and write it back through
    /// the guard only after the save succeeded.
    pub(crate) async fn index(&self) -> RecordResult<MappedMutexGuard<'_, Index>> {
        let mut slot = self.index.lock().await;
        if slot.is_none() {
            *slot = Some(self.load_index().await?);
        }
        Ok(MutexGuard::map(slot, |slot| slot.get_or_insert_with(Index::new)))
    }

    /// A snapshot of the current index.
    ///
    /// An absent index pointer yields an empty index; nothing is written
    /// until the first save.
    pub async fn get_index(&self) -> RecordResult<Index> {
        Ok(self.index().await?.clone())
    }

    /// Persist the cached index, replacing it first when `replacement` is
    /// given.
    pub async fn save_index(&self, replacement: Option<Index>) -> RecordResult<()> {
        let mut slot = self.index.lock().await;
        match replacement {
            Some(index) => *slot = Some(index),
            None if slot.is_none() => *slot = Some(self.load_index().await?),
            None => {}
        }
        if let Some(index) = slot.as_ref() {
            self.persist(index).await?;
        }
        Ok(())
    }

    async fn load_index(&self) -> RecordResult<Index> {
        let pointer = self.scheme.index_pointer();
        let Some(cid) = self.refs.get(pointer).await? else {
            debug!(pointer, "no index yet");
            return Ok(Index::new());
        };
        let object = self
            .objects
            .get(&cid)
            .await?
            .ok_or_else(|| RecordError::MissingObject(format!("index {cid}")))?;
        let index: Index = open_json(&object.data, &self.key)?;
        debug!(pointer, entries = index.len(), "loaded index");
        Ok(index)
    }

    /// Seal `index` as a new object and repoint the index pointer at it.
    pub(crate) async fn persist(&self, index: &Index) -> RecordResult<ContentId> {
        let object = StoredObject::new(self.scheme.index_kind(), seal_json(index, &self.key)?);
        self.replace_pointer(self.scheme.index_pointer(), &object).await
    }

    /// Write `object`, repoint `pointer` at it and drop the object it
    /// replaced. A failed cleanup is logged and otherwise ignored.
    async fn replace_pointer(&self, pointer: &str, object: &StoredObject) -> RecordResult<ContentId> {
        let previous = self.refs.get(pointer).await?;
        let cid = self.objects.put(object).await?;
        self.refs.put(pointer, cid).await?;

        if let Some(old) = previous.filter(|old| *old != cid) {
            match self.objects.delete(&old).await {
                Ok(_) => debug!(pointer, %old, "removed superseded object"),
                Err(e) => warn!(pointer, %old, error = %e, "superseded object not removed"),
            }
        }
        Ok(cid)
    }

    // ---- Version objects ----

    /// Load and open a version object.
    ///
    /// Missing, corrupt and undecryptable objects all yield `Ok(None)` so a
    /// chain walk ends quietly at trimmed history. Backend failures are
    /// still errors.
    pub async fn get_version_object(&self, cid: &ContentId) -> RecordResult<Option<VersionObject>> {
        let object = match self.objects.get(cid).await {
            Ok(Some(object)) => object,
            Ok(None) => return Ok(None),
            Err(e @ (StoreError::HashMismatch { .. } | StoreError::CorruptObject { .. })) => {
                warn!(%cid, error = %e, "version object corrupt");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match open_json::<VersionObject>(&object.data, &self.key) {
            Ok(version) => Ok(Some(version)),
            Err(e) => {
                warn!(%cid, error = %e, "version object unreadable");
                Ok(None)
            }
        }
    }

    /// Seal and store a version object.
    pub async fn put_version_object(&self, version: &VersionObject) -> RecordResult<ContentId> {
        let object = StoredObject::new(self.scheme.version_kind(), seal_json(version, &self.key)?);
        Ok(self.objects.put(&object).await?)
    }

    // ---- Note ----

    /// The free-text note, empty when none has been saved.
    pub async fn get_note(&self) -> RecordResult<Zeroizing<Vec<u8>>> {
        let Some(cid) = self.refs.get(names::NOTE).await? else {
            return Ok(Zeroizing::new(Vec::new()));
        };
        let Some(object) = self.objects.get(&cid).await? else {
            warn!(%cid, "note pointer dangles");
            return Ok(Zeroizing::new(Vec::new()));
        };
        Ok(Zeroizing::new(open(&object.data, &self.key)?))
    }

    /// Replace the free-text note.
    pub async fn save_note(&self, note: &[u8]) -> RecordResult<ContentId> {
        let object = StoredObject::new(self.scheme.note_kind(), seal(note, &self.key)?);
        self.replace_pointer(names::NOTE, &object).await
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}
