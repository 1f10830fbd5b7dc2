//! ChaCha20-Poly1305 envelope for every stored object.
//!
//! Wire layout:
//!
//! ```text
//! nonce (12) ‖ salt (16, passphrase material only) ‖ ciphertext ‖ tag (16)
//! ```
//!
//! Passphrase material derives a fresh key per envelope from the embedded
//! salt via PBKDF2-HMAC-SHA512. The derivation cost is intentional and is
//! paid on both seal and open.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;

use crate::error::{CryptoError, CryptoResult};
use crate::key::KeyMaterial;

/// 12-byte ChaCha20-Poly1305 nonce.
pub const NONCE_SIZE: usize = 12;

/// 16-byte PBKDF2 salt, present only for passphrase material.
pub const SALT_SIZE: usize = 16;

/// 16-byte Poly1305 authentication tag.
pub const TAG_SIZE: usize = 16;

fn salt_len(key: &KeyMaterial) -> usize {
    if key.is_passphrase() {
        SALT_SIZE
    } else {
        0
    }
}

/// Encrypt `plaintext` into a self-describing envelope.
pub fn seal(plaintext: &[u8], key: &KeyMaterial) -> CryptoResult<Vec<u8>> {
    let mut rng = rand::thread_rng();

    let mut nonce = [0u8; NONCE_SIZE];
    rng.fill_bytes(&mut nonce);

    let mut salt = vec![0u8; salt_len(key)];
    rng.fill_bytes(&mut salt);

    let cipher_key = key.cipher_key(&salt);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&*cipher_key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    let mut out = Vec::with_capacity(NONCE_SIZE + salt.len() + ciphertext.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&salt);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt and authenticate an envelope produced by [`seal`].
///
/// Any failure (truncated input, wrong key, tampering with any byte)
/// yields [`CryptoError::AuthenticationFailed`].
pub fn open(envelope: &[u8], key: &KeyMaterial) -> CryptoResult<Vec<u8>> {
    let salt_len = salt_len(key);
    if envelope.len() < NONCE_SIZE + salt_len + TAG_SIZE {
        return Err(CryptoError::AuthenticationFailed);
    }

    let (nonce, rest) = envelope.split_at(NONCE_SIZE);
    let (salt, body) = rest.split_at(salt_len);

    let cipher_key = key.cipher_key(salt);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&*cipher_key));
    cipher
        .decrypt(Nonce::from_slice(nonce), body)
        .map_err(|_| CryptoError::AuthenticationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KEY_SIZE;
    use proptest::prelude::*;

    fn test_key() -> KeyMaterial {
        KeyMaterial::key([9u8; KEY_SIZE])
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    #[test]
    fn passphrase_layout_includes_salt() {
        let envelope = seal(b"hello", &KeyMaterial::passphrase("pw")).unwrap();
        assert_eq!(envelope.len(), NONCE_SIZE + SALT_SIZE + 5 + TAG_SIZE);
    }

    #[test]
    fn key_layout_omits_salt() {
        let envelope = seal(b"hello", &test_key()).unwrap();
        assert_eq!(envelope.len(), NONCE_SIZE + 5 + TAG_SIZE);
    }

    #[test]
    fn each_seal_is_unique() {
        let a = seal(b"same text", &test_key()).unwrap();
        let b = seal(b"same text", &test_key()).unwrap();
        assert_ne!(a, b);
        assert_ne!(a[..NONCE_SIZE], b[..NONCE_SIZE]);
    }

    // -----------------------------------------------------------------------
    // Round-trip
    // -----------------------------------------------------------------------

    #[test]
    fn passphrase_roundtrip() {
        let material = KeyMaterial::passphrase("testpassphrase");
        let plaintext = br#"{"key1":"hello","key2":{"num":123}}"#;
        let envelope = seal(plaintext, &material).unwrap();
        assert_eq!(open(&envelope, &material).unwrap(), plaintext);
    }

    #[test]
    fn empty_plaintext_roundtrip() {
        let envelope = seal(b"", &test_key()).unwrap();
        assert!(open(&envelope, &test_key()).unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Authentication
    // -----------------------------------------------------------------------

    #[test]
    fn wrong_passphrase_fails_authentication() {
        let envelope = seal(b"secret", &KeyMaterial::passphrase("right")).unwrap();
        assert_eq!(
            open(&envelope, &KeyMaterial::passphrase("wrong")),
            Err(CryptoError::AuthenticationFailed)
        );
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let envelope = seal(b"secret", &test_key()).unwrap();
        let other = KeyMaterial::key([1u8; KEY_SIZE]);
        assert_eq!(open(&envelope, &other), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn truncated_envelope_fails_authentication() {
        let envelope = seal(b"secret", &test_key()).unwrap();
        assert_eq!(
            open(&envelope[..NONCE_SIZE + 3], &test_key()),
            Err(CryptoError::AuthenticationFailed)
        );
        assert_eq!(open(&[], &test_key()), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn tampered_salt_fails_authentication() {
        let material = KeyMaterial::passphrase("pw");
        let mut envelope = seal(b"secret", &material).unwrap();
        envelope[NONCE_SIZE] ^= 0x01;
        assert_eq!(open(&envelope, &material), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn scheme_mismatch_fails_authentication() {
        let envelope = seal(b"secret", &KeyMaterial::passphrase("pw")).unwrap();
        assert_eq!(open(&envelope, &test_key()), Err(CryptoError::AuthenticationFailed));
    }

    proptest! {
        #[test]
        fn roundtrip_any_plaintext(plaintext in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let envelope = seal(&plaintext, &test_key()).unwrap();
            prop_assert_eq!(open(&envelope, &test_key()).unwrap(), plaintext);
        }

        #[test]
        fn any_single_bit_flip_is_rejected(
            plaintext in proptest::collection::vec(any::<u8>(), 0..256),
            position in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let mut envelope = seal(&plaintext, &test_key()).unwrap();
            let byte = position.index(envelope.len());
            envelope[byte] ^= 1 << bit;
            prop_assert_eq!(open(&envelope, &test_key()), Err(CryptoError::AuthenticationFailed));
        }
    }
}
