//! Named pointer management for Luna Pass.
//!
//! A pointer is the only mutable thing in a Luna Pass database: it maps a
//! well-known name to the content id of an immutable object. Saving the index
//! writes a fresh object and repoints `index` at it.
//!
//! # Architecture
//!
//! - Pointers are last-writer-wins. There is no compare-and-swap; a single
//!   active process per database is assumed.
//! - Pointer names are plain identifiers (see [`names`]).
//!
//! # Modules
//!
//! - [`error`] -- Error types for pointer operations
//! - [`traits`] -- The [`RefStore`] trait defining the storage interface
//! - [`names`] -- Well-known pointer names and name validation
//! - [`memory`] -- In-memory [`InMemoryRefStore`] for tests

pub mod error;
pub mod memory;
pub mod names;
pub mod traits;

pub use error::{RefError, Result};
pub use memory::InMemoryRefStore;
pub use names::validate_pointer_name;
pub use traits::RefStore;
