//! The keyring: a random data key sealed under the user's passphrase.
//!
//! Its presence is what marks a database as initialised under the current
//! scheme, and therefore as already migrated.

use std::sync::Arc;

use luna_crypto::{KeyMaterial, KEY_SIZE};
use luna_refs::{names, RefStore};
use luna_store::{ObjectKind, ObjectStore, StoredObject};
use serde::{Deserialize, Serialize};
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::codec::{open_json, seal_json};
use crate::error::{RecordError, RecordResult};

const KEYRING_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
struct KeyringFile {
    version: u32,
    /// Hex-encoded data key.
    key: String,
}

/// Keyring service over a database's object and pointer stores.
pub struct Keyring {
    objects: Arc<dyn ObjectStore>,
    refs: Arc<dyn RefStore>,
}

impl Keyring {
    pub fn new(objects: Arc<dyn ObjectStore>, refs: Arc<dyn RefStore>) -> Self {
        Self { objects, refs }
    }

    /// Returns `true` once a keyring has been created.
    pub async fn exists(&self) -> RecordResult<bool> {
        Ok(self.refs.exists(names::KEYRING).await?)
    }

    /// Draw a fresh data key, seal it under `passphrase` and store it.
    pub async fn create(&self, passphrase: &str) -> RecordResult<KeyMaterial> {
        if self.exists().await? {
            return Err(RecordError::KeyringExists);
        }

        let material = KeyMaterial::generate();
        let key = material
            .key_bytes()
            .ok_or_else(|| RecordError::Crypto("generated material is not key-grade".into()))?;
        let file = KeyringFile {
            version: KEYRING_VERSION,
            key: hex::encode(key),
        };

        let sealed = seal_json(&file, &KeyMaterial::passphrase(passphrase))?;
        let cid = self
            .objects
            .put(&StoredObject::new(ObjectKind::Keyring, sealed))
            .await?;
        self.refs.put(names::KEYRING, cid).await?;
        info!(%cid, "keyring created");
        Ok(material)
    }

    /// Open the keyring with `passphrase`.
    ///
    /// A wrong passphrase is [`RecordError::AuthenticationFailed`].
    pub async fn load(&self, passphrase: &str) -> RecordResult<KeyMaterial> {
        let cid = self
            .refs
            .get(names::KEYRING)
            .await?
            .ok_or_else(|| RecordError::MissingObject(names::KEYRING.to_string()))?;
        let object = self
            .objects
            .get(&cid)
            .await?
            .ok_or_else(|| RecordError::MissingObject(format!("keyring {cid}")))?;

        let file: KeyringFile = open_json(&object.data, &KeyMaterial::passphrase(passphrase))?;
        if file.version != KEYRING_VERSION {
            return Err(RecordError::Crypto(format!(
                "unsupported keyring version {}",
                file.version
            )));
        }

        let bytes = Zeroizing::new(
            hex::decode(&file.key).map_err(|e| RecordError::Crypto(format!("keyring key: {e}")))?,
        );
        if bytes.len() != KEY_SIZE {
            return Err(RecordError::Crypto(format!(
                "keyring key has {} bytes",
                bytes.len()
            )));
        }
        Ok(KeyMaterial::key_from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luna_refs::InMemoryRefStore;
    use luna_store::InMemoryObjectStore;

    fn keyring() -> Keyring {
        Keyring::new(
            Arc::new(InMemoryObjectStore::new()),
            Arc::new(InMemoryRefStore::new()),
        )
    }

    #[tokio::test]
    async fn create_then_load_yields_same_key() {
        let keyring = keyring();
        assert!(!keyring.exists().await.unwrap());

        let created = keyring.create("pw").await.unwrap();
        assert!(keyring.exists().await.unwrap());

        let loaded = keyring.load("pw").await.unwrap();
        assert_eq!(created.key_bytes(), loaded.key_bytes());
        assert!(!loaded.is_passphrase());
    }

    #[tokio::test]
    async fn wrong_passphrase_is_authentication_failure() {
        let keyring = keyring();
        keyring.create("right").await.unwrap();
        assert!(matches!(
            keyring.load("wrong").await.unwrap_err(),
            RecordError::AuthenticationFailed
        ));
    }

    #[tokio::test]
    async fn create_twice_is_rejected() {
        let keyring = keyring();
        keyring.create("pw").await.unwrap();
        assert!(matches!(
            keyring.create("pw").await.unwrap_err(),
            RecordError::KeyringExists
        ));
    }

    #[tokio::test]
    async fn load_without_keyring_is_missing() {
        assert!(matches!(
            keyring().load("pw").await.unwrap_err(),
            RecordError::MissingObject(_)
        ));
    }
}
