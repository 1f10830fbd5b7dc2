use luna_types::ContentId;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g. `"luna-version-v1"`) that is
/// prepended to every hash computation. The legacy scheme addresses every
/// object under its own tag, so re-encrypting a store under the current
/// scheme also moves every object into a fresh address space.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for every object written by the legacy passphrase scheme.
    pub const LEGACY: Self = Self {
        domain: "luna-legacy-v1",
    };
    /// Hasher for serialized index objects.
    pub const INDEX: Self = Self {
        domain: "luna-index-v1",
    };
    /// Hasher for entry version objects.
    pub const VERSION: Self = Self {
        domain: "luna-version-v1",
    };
    /// Hasher for sealed keyring objects.
    pub const KEYRING: Self = Self {
        domain: "luna-keyring-v1",
    };
    /// Hasher for the free-text note.
    pub const NOTE: Self = Self {
        domain: "luna-note-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ContentId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ContentId::from_hash(*hasher.finalize().as_bytes())
    }

    /// Verify that data produces the expected content id.
    pub fn verify(&self, data: &[u8], expected: &ContentId) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}
