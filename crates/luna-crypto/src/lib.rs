//! Cryptographic primitives for Luna Pass.
//!
//! Provides the authenticated-encryption envelope every stored object passes
//! through, passphrase and key-grade key material, and domain-separated
//! BLAKE3 content hashing for object addressing.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod envelope;
pub mod error;
pub mod hasher;
pub mod key;

pub use envelope::{open, seal, NONCE_SIZE, SALT_SIZE, TAG_SIZE};
pub use error::{CryptoError, CryptoResult};
pub use hasher::ContentHasher;
pub use key::{KeyMaterial, KEY_SIZE, PBKDF2_ITERATIONS};
