use luna_refs::names;
use luna_store::ObjectKind;

/// Encryption and addressing scheme of a record store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    /// Every object sealed directly under the passphrase and addressed in the
    /// legacy domain; the index hangs off `luna-pass`.
    Legacy,
    /// Objects sealed under the keyring key, addressed per kind; the index
    /// hangs off `index`.
    Keyring,
}

impl Scheme {
    pub fn index_pointer(&self) -> &'static str {
        match self {
            Self::Legacy => names::LEGACY_INDEX,
            Self::Keyring => names::INDEX,
        }
    }

    pub fn index_kind(&self) -> ObjectKind {
        match self {
            Self::Legacy => ObjectKind::Legacy,
            Self::Keyring => ObjectKind::Index,
        }
    }

    pub fn version_kind(&self) -> ObjectKind {
        match self {
            Self::Legacy => ObjectKind::Legacy,
            Self::Keyring => ObjectKind::Version,
        }
    }

    pub fn note_kind(&self) -> ObjectKind {
        match self {
            Self::Legacy => ObjectKind::Legacy,
            Self::Keyring => ObjectKind::Note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemes_use_distinct_index_pointers() {
        assert_ne!(Scheme::Legacy.index_pointer(), Scheme::Keyring.index_pointer());
    }

    #[test]
    fn legacy_addresses_everything_in_one_domain() {
        let s = Scheme::Legacy;
        assert_eq!(s.index_kind(), s.version_kind());
        assert_eq!(s.version_kind(), s.note_kind());
    }

    #[test]
    fn keyring_separates_kinds() {
        let s = Scheme::Keyring;
        assert_eq!(s.index_kind(), ObjectKind::Index);
        assert_eq!(s.version_kind(), ObjectKind::Version);
        assert_eq!(s.note_kind(), ObjectKind::Note);
    }
}
