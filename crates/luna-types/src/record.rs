//! Index and version-object shapes.
//!
//! These are the plaintext forms that pass through the envelope codec. The
//! index maps entry ids to an [`IndexValue`]; each [`IndexValue`] points at
//! the newest [`VersionObject`] of a backward-linked chain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::object::ContentId;

/// Property holding the creation time. Lives only in [`IndexValue`].
pub const ADDED: &str = "added";

/// Property holding the time of the last write. Set on every version.
pub const UPDATED: &str = "updated";

/// Open property bag of an entry.
pub type Props = BTreeMap<String, String>;

/// Mutable mapping from entry id to its current version.
pub type Index = BTreeMap<String, IndexValue>;

/// Per-entry index record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexValue {
    /// Creation timestamp. Set once and never changed by updates.
    pub added: String,
    /// Most recent version object of the entry.
    pub head: ContentId,
}

impl IndexValue {
    pub fn new(added: impl Into<String>, head: ContentId) -> Self {
        Self {
            added: added.into(),
            head,
        }
    }
}

/// One immutable snapshot of an entry's properties.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionObject {
    /// The previous version, absent for the first version of a chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<ContentId>,
    /// Properties as of this version. Never contains `added`.
    pub props: Props,
}

impl VersionObject {
    /// Create a version object, stripping any `added` property.
    pub fn new(prev: Option<ContentId>, mut props: Props) -> Self {
        props.remove(ADDED);
        Self { prev, props }
    }

    /// Returns `true` if this is the oldest version of its chain.
    pub fn is_root(&self) -> bool {
        self.prev.is_none()
    }

    /// The props merged with the stable `added` timestamp from the index.
    pub fn props_with_added(&self, added: &str) -> Props {
        let mut props = self.props.clone();
        props.insert(ADDED.to_string(), added.to_string());
        props
    }
}
