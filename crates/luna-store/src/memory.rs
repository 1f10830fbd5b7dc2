use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use luna_types::ContentId;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. All objects are held in memory behind a
/// `RwLock`. Objects are cloned on read/write.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ContentId, StoredObject>>,
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Backend(format!("lock poisoned: {e}"))
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, object: &StoredObject) -> StoreResult<ContentId> {
        let id = object.compute_id();
        let mut map = self.objects.write().map_err(poisoned)?;
        map.entry(id).or_insert_with(|| object.clone());
        tracing::debug!(%id, kind = %object.kind, size = object.size, "stored object");
        Ok(id)
    }

    async fn get(&self, id: &ContentId) -> StoreResult<Option<StoredObject>> {
        let map = self.objects.read().map_err(poisoned)?;
        Ok(map.get(id).cloned())
    }

    async fn delete(&self, id: &ContentId) -> StoreResult<bool> {
        let mut map = self.objects.write().map_err(poisoned)?;
        Ok(map.remove(id).is_some())
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectKind;

    fn make_object(content: &[u8]) -> StoredObject {
        StoredObject::new(ObjectKind::Version, content.to_vec())
    }

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn put_and_get() {
        let store = InMemoryObjectStore::new();
        let obj = make_object(b"hello world");
        let id = store.put(&obj).await.unwrap();

        let read_back = store.get(&id).await.unwrap().expect("should exist");
        assert_eq!(read_back, obj);
        assert_eq!(read_back.compute_id(), id);
    }

    #[tokio::test]
    async fn get_missing_object_returns_none() {
        let store = InMemoryObjectStore::new();
        let id = ContentId::from_bytes(b"missing");
        assert!(store.get(&id).await.unwrap().is_none());
    }

    // -----------------------------------------------------------------------
    // Content-addressing correctness
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn same_content_produces_same_id() {
        let store = InMemoryObjectStore::new();
        let id1 = store.put(&make_object(b"identical content")).await.unwrap();
        let id2 = store.put(&make_object(b"identical content")).await.unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn different_content_produces_different_ids() {
        let store = InMemoryObjectStore::new();
        let id1 = store.put(&make_object(b"aaa")).await.unwrap();
        let id2 = store.put(&make_object(b"bbb")).await.unwrap();
        assert_ne!(id1, id2);
        assert_eq!(store.len(), 2);
    }

    // -----------------------------------------------------------------------
    // Exists / Delete
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn exists_tracks_presence() {
        let store = InMemoryObjectStore::new();
        assert!(!store.exists(&ContentId::from_bytes(b"nope")).await.unwrap());
        let id = store.put(&make_object(b"present")).await.unwrap();
        assert!(store.exists(&id).await.unwrap());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemoryObjectStore::new();
        let id = store.put(&make_object(b"to-delete")).await.unwrap();
        assert!(store.delete(&id).await.unwrap());
        assert!(!store.exists(&id).await.unwrap());
        assert!(!store.delete(&id).await.unwrap());
    }

    // -----------------------------------------------------------------------
    // Utility methods
    // -----------------------------------------------------------------------

    #[test]
    fn debug_format() {
        let store = InMemoryObjectStore::default();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryObjectStore"));
        assert!(debug.contains("object_count"));
        assert!(store.is_empty());
    }
}
