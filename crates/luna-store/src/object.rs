use std::fmt;
use std::str::FromStr;

use luna_crypto::ContentHasher;
use luna_types::ContentId;

/// The kind of object stored.
///
/// The kind selects the hashing domain, so the same bytes stored under two
/// kinds get two different ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Any object written by the legacy passphrase scheme.
    Legacy,
    /// Sealed index of the current scheme.
    Index,
    /// Sealed entry version of the current scheme.
    Version,
    /// Passphrase-sealed keyring.
    Keyring,
    /// Sealed free-text note.
    Note,
}

impl ObjectKind {
    /// Stable tag used by persistent backends.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Index => "index",
            Self::Version => "version",
            Self::Keyring => "keyring",
            Self::Note => "note",
        }
    }

    fn hasher(&self) -> &'static ContentHasher {
        match self {
            Self::Legacy => &ContentHasher::LEGACY,
            Self::Index => &ContentHasher::INDEX,
            Self::Version => &ContentHasher::VERSION,
            Self::Keyring => &ContentHasher::KEYRING,
            Self::Note => &ContentHasher::NOTE,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(Self::Legacy),
            "index" => Ok(Self::Index),
            "version" => Ok(Self::Version),
            "keyring" => Ok(Self::Keyring),
            "note" => Ok(Self::Note),
            other => Err(format!("unknown object kind: {other}")),
        }
    }
}

/// A stored object: kind tag + sealed bytes + cached size.
///
/// `StoredObject` is the unit of storage. The store never interprets the
/// contents of the data -- it is always an envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The sealed bytes of the object.
    pub data: Vec<u8>,
    /// The size of `data` in bytes.
    pub size: u64,
}

impl StoredObject {
    /// Create a new stored object from kind and data.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self { kind, data, size }
    }

    /// Compute the content-addressed ID for this object.
    pub fn compute_id(&self) -> ContentId {
        self.kind.hasher().hash(&self.data)
    }

    /// Returns `true` if `id` is the content address of this object.
    pub fn verify(&self, id: &ContentId) -> bool {
        self.kind.hasher().verify(&self.data, id)
    }
}
