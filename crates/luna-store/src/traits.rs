use async_trait::async_trait;
use luna_types::ContentId;

use crate::error::StoreResult;
use crate::object::StoredObject;

/// Content-addressed immutable object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. The returned ID is a deterministic
///   function of the object's kind and bytes.
/// - Writing an object that already exists is a no-op returning the same ID.
/// - Deleting an absent object succeeds and returns `false`.
/// - All I/O errors are propagated, never silently ignored.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object and return its content-addressed ID.
    async fn put(&self, object: &StoredObject) -> StoreResult<ContentId>;

    /// Read an object by its content-addressed ID.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    async fn get(&self, id: &ContentId) -> StoreResult<Option<StoredObject>>;

    /// Delete an object by ID. Returns `true` if the object existed.
    async fn delete(&self, id: &ContentId) -> StoreResult<bool>;

    /// Check whether an object exists in the store.
    async fn exists(&self, id: &ContentId) -> StoreResult<bool> {
        Ok(self.get(id).await?.is_some())
    }
}
