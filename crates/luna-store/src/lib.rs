//! Content-addressed object storage for Luna Pass.
//!
//! Every sealed index, version object, keyring and note is stored as an
//! immutable object identified by the BLAKE3 hash of its bytes
//! (domain-separated by object kind).
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//! - `luna-sqlite` -- the single-file database used by the CLI
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Write-then-link: write the object, then repoint a named ref at it.
//! 3. Deleting an absent object is not an error.
//! 4. The store never interprets object contents -- it only ever sees ciphertext.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod object;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectStore;
pub use object::{ObjectKind, StoredObject};
pub use traits::ObjectStore;
