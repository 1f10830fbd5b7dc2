//! Foundation types for Luna Pass.
//!
//! This crate provides the identifiers and record shapes shared by every
//! other Luna Pass crate.
//!
//! # Key Types
//!
//! - [`ContentId`] -- Content-addressed identifier (BLAKE3 hash) of a stored object
//! - [`Index`] / [`IndexValue`] -- Mutable mapping from entry id to its current version
//! - [`VersionObject`] -- One immutable snapshot of an entry plus a back-pointer
//! - [`Props`] -- Open string-to-string property bag

pub mod error;
pub mod object;
pub mod record;
pub mod timestamp;

pub use error::TypeError;
pub use object::ContentId;
pub use record::{Index, IndexValue, Props, VersionObject, ADDED, UPDATED};
pub use timestamp::{is_timestamp, now_timestamp};
