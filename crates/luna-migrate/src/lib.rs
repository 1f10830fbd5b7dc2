//! Migration of a Luna Pass database from the legacy passphrase scheme to
//! the keyring scheme.
//!
//! The engine reads the legacy index and chains through [`LegacyAdapter`],
//! rebuilds every chain oldest-first under a freshly created keyring, saves
//! the new index and then proves equivalence by walking old and new chains
//! in lockstep. A `.bak` copy of the database file is taken before the
//! first write and is never removed.

pub mod engine;
pub mod error;
pub mod legacy;
pub mod verify;

pub use engine::{backup_path, MigrationOutcome, MigrationReport, Migrator};
pub use error::{MigrationError, MigrationResult};
pub use legacy::LegacyAdapter;
pub use verify::{verify_migration, Mismatch, MismatchKind};
