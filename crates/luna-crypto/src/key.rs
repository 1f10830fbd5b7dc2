//! Key material for the envelope codec.

use std::fmt;

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

/// ChaCha20-Poly1305 key size in bytes.
pub const KEY_SIZE: usize = 32;

/// PBKDF2-HMAC-SHA512 rounds for passphrase-derived keys.
///
/// The envelope layout does not record the round count, so this value is
/// fixed for the lifetime of every store that was ever sealed with it.
pub const PBKDF2_ITERATIONS: u32 = 10_000;

/// Secret input to [`seal`](crate::seal) and [`open`](crate::open).
///
/// A passphrase is stretched with a salted, deliberately slow KDF on every
/// call; key-grade bytes (from a keyring) are used directly. Both variants
/// are zeroized on drop.
#[derive(Clone)]
pub enum KeyMaterial {
    /// A user passphrase (legacy scheme, keyring wrapping).
    Passphrase(Zeroizing<String>),
    /// 32 bytes of key-grade material (current scheme).
    Key(Zeroizing<[u8; KEY_SIZE]>),
}

impl KeyMaterial {
    /// Wrap a passphrase.
    pub fn passphrase(passphrase: impl Into<String>) -> Self {
        Self::Passphrase(Zeroizing::new(passphrase.into()))
    }

    /// Wrap key-grade bytes.
    pub fn key(bytes: [u8; KEY_SIZE]) -> Self {
        Self::Key(Zeroizing::new(bytes))
    }

    /// Wrap key-grade bytes from a slice of unknown length.
    pub fn key_from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut key = Zeroizing::new([0u8; KEY_SIZE]);
        key.copy_from_slice(bytes);
        Ok(Self::Key(key))
    }

    /// Draw fresh random key-grade material.
    pub fn generate() -> Self {
        let mut key = Zeroizing::new([0u8; KEY_SIZE]);
        rand::thread_rng().fill_bytes(&mut *key);
        Self::Key(key)
    }

    /// Returns `true` for passphrase material.
    pub fn is_passphrase(&self) -> bool {
        matches!(self, Self::Passphrase(_))
    }

    /// The raw key bytes, for key-grade material only.
    pub fn key_bytes(&self) -> Option<&[u8; KEY_SIZE]> {
        match self {
            Self::Passphrase(_) => None,
            Self::Key(key) => Some(key),
        }
    }

    /// The cipher key for one envelope.
    ///
    /// `salt` is ignored for key-grade material.
    pub(crate) fn cipher_key(&self, salt: &[u8]) -> Zeroizing<[u8; KEY_SIZE]> {
        match self {
            Self::Passphrase(passphrase) => {
                let mut key = Zeroizing::new([0u8; KEY_SIZE]);
                pbkdf2_hmac::<Sha512>(passphrase.as_bytes(), salt, PBKDF2_ITERATIONS, &mut *key);
                key
            }
            Self::Key(key) => key.clone(),
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passphrase(_) => f.write_str("KeyMaterial::Passphrase(<redacted>)"),
            Self::Key(_) => f.write_str("KeyMaterial::Key(<redacted>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic_for_same_salt() {
        let material = KeyMaterial::passphrase("password123");
        let salt = [7u8; 16];
        assert_eq!(*material.cipher_key(&salt), *material.cipher_key(&salt));
    }

    #[test]
    fn different_salts_different_keys() {
        let material = KeyMaterial::passphrase("password");
        assert_ne!(*material.cipher_key(&[1u8; 16]), *material.cipher_key(&[2u8; 16]));
    }

    #[test]
    fn different_passphrases_different_keys() {
        let salt = [3u8; 16];
        let a = KeyMaterial::passphrase("password1").cipher_key(&salt);
        let b = KeyMaterial::passphrase("password2").cipher_key(&salt);
        assert_ne!(*a, *b);
    }

    #[test]
    fn key_grade_material_is_used_directly() {
        let material = KeyMaterial::key([42u8; KEY_SIZE]);
        assert_eq!(*material.cipher_key(&[]), [42u8; KEY_SIZE]);
        assert_eq!(material.key_bytes(), Some(&[42u8; KEY_SIZE]));
    }

    #[test]
    fn passphrase_has_no_key_bytes() {
        let material = KeyMaterial::passphrase("pw");
        assert!(material.is_passphrase());
        assert!(material.key_bytes().is_none());
    }

    #[test]
    fn generated_keys_are_unique() {
        let a = KeyMaterial::generate();
        let b = KeyMaterial::generate();
        assert_ne!(a.key_bytes(), b.key_bytes());
    }

    #[test]
    fn key_from_slice_checks_length() {
        let err = KeyMaterial::key_from_slice(&[0u8; 16]).unwrap_err();
        assert_eq!(
            err,
            CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: 16
            }
        );
        assert!(KeyMaterial::key_from_slice(&[0u8; KEY_SIZE]).is_ok());
    }

    #[test]
    fn debug_redacts_secrets() {
        let debug = format!("{:?}", KeyMaterial::passphrase("hunter2"));
        assert!(!debug.contains("hunter2"));
    }
}
