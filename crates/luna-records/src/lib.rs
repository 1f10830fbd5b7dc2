//! Versioned encrypted record store for Luna Pass.
//!
//! Provides the session object every command works through: a lazily loaded
//! index, backward-linked version chains of sealed objects, and the chain
//! operations (add, update, get, rename, delete, list, history) built on
//! them. Also hosts the keyring service, the free-text note and the
//! passphrase provider capability.

pub mod codec;
pub mod error;
pub mod keyring;
pub mod passphrase;
pub mod scheme;
pub mod store;

mod chain;

pub use error::{RecordError, RecordResult};
pub use keyring::Keyring;
pub use passphrase::{CachingProvider, PassphraseProvider, PromptReason, StaticPassphrase};
pub use scheme::Scheme;
pub use store::RecordStore;

// Re-export key types
pub use luna_crypto::KeyMaterial;
pub use luna_types::{Index, IndexValue, Props, VersionObject, ADDED, UPDATED};
