//! Post-migration equivalence check.

use std::fmt;

use luna_records::{RecordResult, RecordStore};
use luna_types::{ContentId, Index};
use tracing::error;

use crate::legacy::LegacyAdapter;

/// What differed between the legacy and the migrated store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MismatchKind {
    /// The entry is missing from the new index.
    MissingEntry,
    /// The new index has an entry the legacy one does not.
    ExtraEntry,
    /// `added` differs between the two indexes.
    AddedMismatch,
    /// The props of this generation differ.
    PropsMismatch,
    /// Only one of the two chains has an object at this generation.
    MissingVersion,
    /// Only one of the two chains continues past this generation.
    ChainLengthMismatch,
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingEntry => "missing from the new index",
            Self::ExtraEntry => "present only in the new index",
            Self::AddedMismatch => "added does not match",
            Self::PropsMismatch => "props do not match",
            Self::MissingVersion => "version exists only on one side",
            Self::ChainLengthMismatch => "prev exists only on one side",
        })
    }
}

/// One verification finding. `generation` counts back from the head.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub id: String,
    pub generation: usize,
    pub kind: MismatchKind,
}

impl Mismatch {
    fn new(id: &str, generation: usize, kind: MismatchKind) -> Self {
        Self {
            id: id.to_string(),
            generation,
            kind,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{{}}}: {}", self.id, self.generation, self.kind)
    }
}

/// Compare every legacy entry against the migrated store.
///
/// Does not stop at the first finding; each mismatch is logged and all of
/// them are returned.
pub async fn verify_migration(
    old_index: &Index,
    legacy: &LegacyAdapter,
    migrated: &RecordStore,
) -> RecordResult<Vec<Mismatch>> {
    let new_index = migrated.get_index().await?;
    let mut mismatches = Vec::new();

    for (id, old) in old_index {
        let Some(new) = new_index.get(id) else {
            mismatches.push(Mismatch::new(id, 0, MismatchKind::MissingEntry));
            continue;
        };
        if old.added != new.added {
            mismatches.push(Mismatch::new(id, 0, MismatchKind::AddedMismatch));
        }
        compare_chains(id, old.head, new.head, legacy, migrated, &mut mismatches).await?;
    }

    for id in new_index.keys().filter(|id| !old_index.contains_key(*id)) {
        mismatches.push(Mismatch::new(id, 0, MismatchKind::ExtraEntry));
    }

    for mismatch in &mismatches {
        error!(id = %mismatch.id, generation = mismatch.generation, kind = %mismatch.kind, "migration mismatch");
    }
    Ok(mismatches)
}

async fn compare_chains(
    id: &str,
    old_head: ContentId,
    new_head: ContentId,
    legacy: &LegacyAdapter,
    migrated: &RecordStore,
    mismatches: &mut Vec<Mismatch>,
) -> RecordResult<()> {
    let mut old_next = Some(old_head);
    let mut new_next = Some(new_head);
    let mut generation = 0;

    while old_next.is_some() || new_next.is_some() {
        let old = match old_next {
            Some(cid) => legacy.old_get_version_object(&cid).await?,
            None => None,
        };
        let new = match new_next {
            Some(cid) => migrated.get_version_object(&cid).await?,
            None => None,
        };

        let (old, new) = match (old, new) {
            (Some(old), Some(new)) => (old, new),
            (None, None) => break,
            _ => {
                mismatches.push(Mismatch::new(id, generation, MismatchKind::MissingVersion));
                break;
            }
        };

        if old.props != new.props {
            mismatches.push(Mismatch::new(id, generation, MismatchKind::PropsMismatch));
        }
        if old.prev.is_some() != new.prev.is_some() {
            mismatches.push(Mismatch::new(id, generation, MismatchKind::ChainLengthMismatch));
            break;
        }

        old_next = old.prev;
        new_next = new.prev;
        generation += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_display_names_entry_and_generation() {
        let m = Mismatch::new("site", 2, MismatchKind::PropsMismatch);
        assert_eq!(m.to_string(), "site{2}: props do not match");
    }
}
