//! JSON values through the envelope codec.

use luna_crypto::{open, seal, KeyMaterial};
use serde::de::DeserializeOwned;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::error::RecordResult;

/// Serialize `value` to JSON and seal it.
pub fn seal_json<T: Serialize>(value: &T, key: &KeyMaterial) -> RecordResult<Vec<u8>> {
    let plaintext = Zeroizing::new(serde_json::to_vec(value)?);
    Ok(seal(&plaintext, key)?)
}

/// Open an envelope and deserialize the JSON inside.
pub fn open_json<T: DeserializeOwned>(envelope: &[u8], key: &KeyMaterial) -> RecordResult<T> {
    let plaintext = Zeroizing::new(open(envelope, key)?);
    Ok(serde_json::from_slice(&plaintext)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;
    use luna_types::{Props, VersionObject};

    #[test]
    fn json_survives_the_envelope() {
        let key = KeyMaterial::generate();
        let mut props = Props::new();
        props.insert("user".into(), "bob".into());
        let version = VersionObject::new(None, props);

        let sealed = seal_json(&version, &key).unwrap();
        let opened: VersionObject = open_json(&sealed, &key).unwrap();
        assert_eq!(opened, version);
    }

    #[test]
    fn wrong_key_is_authentication_failure() {
        let sealed = seal_json(&Props::new(), &KeyMaterial::generate()).unwrap();
        let err = open_json::<Props>(&sealed, &KeyMaterial::generate()).unwrap_err();
        assert!(matches!(err, RecordError::AuthenticationFailed));
    }

    #[test]
    fn wrong_shape_is_serialization_error() {
        let key = KeyMaterial::generate();
        let sealed = seal_json(&"just a string", &key).unwrap();
        let err = open_json::<VersionObject>(&sealed, &key).unwrap_err();
        assert!(matches!(err, RecordError::Serialization(_)));
    }
}
