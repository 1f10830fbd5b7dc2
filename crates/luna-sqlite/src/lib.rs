//! SQLite backend for Luna Pass.
//!
//! One database file holds both the immutable object table and the mutable
//! pointer table. [`SqliteBackend`] implements [`ObjectStore`] and
//! [`RefStore`], so a single `Arc<SqliteBackend>` serves both roles.
//!
//! The database keeps SQLite's default rollback journal. With no `-wal`
//! sidecar, a closed database is always a single self-contained file, which
//! is what migration copies to its `.bak` sibling.
//!
//! [`ObjectStore`]: luna_store::ObjectStore
//! [`RefStore`]: luna_refs::RefStore

mod backend;
mod error;

pub use backend::SqliteBackend;
pub use error::SqliteError;
