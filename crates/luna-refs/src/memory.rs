//! In-memory pointer store for testing and ephemeral use.
//!
//! [`InMemoryRefStore`] stores all pointers in a `HashMap` protected by a
//! `RwLock`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use luna_types::ContentId;

use crate::error::{RefError, Result};
use crate::names::validate_pointer_name;
use crate::traits::RefStore;

/// An in-memory implementation of [`RefStore`].
///
/// Data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    refs: RwLock<HashMap<String, ContentId>>,
}

fn poisoned<E: std::fmt::Display>(e: E) -> RefError {
    RefError::Backend(format!("lock poisoned: {e}"))
}

impl InMemoryRefStore {
    /// Create a new empty pointer store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefStore for InMemoryRefStore {
    async fn get(&self, name: &str) -> Result<Option<ContentId>> {
        let refs = self.refs.read().map_err(poisoned)?;
        Ok(refs.get(name).copied())
    }

    async fn put(&self, name: &str, target: ContentId) -> Result<()> {
        validate_pointer_name(name)?;
        let mut refs = self.refs.write().map_err(poisoned)?;
        refs.insert(name.to_string(), target);
        tracing::debug!(name, %target, "pointer updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names;

    fn cid(seed: &[u8]) -> ContentId {
        ContentId::from_bytes(seed)
    }

    #[tokio::test]
    async fn read_nonexistent_pointer() {
        let store = InMemoryRefStore::new();
        assert!(store.get(names::INDEX).await.unwrap().is_none());
        assert!(!store.exists(names::INDEX).await.unwrap());
    }

    #[tokio::test]
    async fn put_and_get() {
        let store = InMemoryRefStore::new();
        store.put(names::INDEX, cid(b"a")).await.unwrap();
        assert_eq!(store.get(names::INDEX).await.unwrap(), Some(cid(b"a")));
        assert!(store.exists(names::INDEX).await.unwrap());
    }

    #[tokio::test]
    async fn put_is_last_writer_wins() {
        let store = InMemoryRefStore::new();
        store.put(names::INDEX, cid(b"first")).await.unwrap();
        store.put(names::INDEX, cid(b"second")).await.unwrap();
        assert_eq!(store.get(names::INDEX).await.unwrap(), Some(cid(b"second")));
    }

    #[tokio::test]
    async fn put_rejects_invalid_name() {
        let store = InMemoryRefStore::new();
        let err = store.put("bad name", cid(b"x")).await.unwrap_err();
        assert!(matches!(err, RefError::InvalidName { .. }));
    }
}
