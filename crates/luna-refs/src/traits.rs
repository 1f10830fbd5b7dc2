//! The [`RefStore`] trait defining the pointer storage interface.

use async_trait::async_trait;
use luna_types::ContentId;

use crate::error::Result;

/// Storage backend for mutable named pointers.
///
/// Implementations must be thread-safe (`Send + Sync`). Writes are
/// last-writer-wins: `put` unconditionally replaces the previous target.
#[async_trait]
pub trait RefStore: Send + Sync {
    /// Read a pointer by name.
    ///
    /// Returns `Ok(None)` if the pointer does not exist.
    async fn get(&self, name: &str) -> Result<Option<ContentId>>;

    /// Create or replace a pointer.
    async fn put(&self, name: &str, target: ContentId) -> Result<()>;

    /// Returns `true` if the pointer exists.
    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.get(name).await?.is_some())
    }
}
