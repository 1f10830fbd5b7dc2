//! Chain operations: per-entry state transitions on top of the index.

use futures::future::join_all;
use luna_store::ObjectStore;
use luna_types::{
    now_timestamp, ContentId, IndexValue, Props, VersionObject, ADDED, UPDATED,
};
use tracing::{debug, info, warn};

use crate::error::{RecordError, RecordResult};
use crate::store::RecordStore;

impl RecordStore {
    /// Create a new entry.
    ///
    /// `updated` defaults to now; `added` is taken from `props` when present
    /// and otherwise also defaults to now. `added` never reaches the version
    /// object.
    pub async fn add(&self, id: &str, mut props: Props) -> RecordResult<()> {
        let mut cached = self.index().await?;
        if cached.contains_key(id) {
            return Err(RecordError::AlreadyExists(id.to_string()));
        }

        let now = now_timestamp();
        let added = props.remove(ADDED).unwrap_or_else(|| now.clone());
        props.entry(UPDATED.to_string()).or_insert(now);

        let head = self.put_version_object(&VersionObject::new(None, props)).await?;
        let mut index = cached.clone();
        index.insert(id.to_string(), IndexValue::new(added, head));
        self.persist(&index).await?;
        *cached = index;
        info!(id, %head, "entry added");
        Ok(())
    }

    /// Write a new version of an existing entry.
    ///
    /// The new props are the head's props minus `keys_to_delete`, overlaid
    /// with `patch`. `updated` is set to now unless the patch carries one.
    /// An `added` key in the patch is ignored.
    pub async fn update(&self, id: &str, mut patch: Props, keys_to_delete: &[String]) -> RecordResult<()> {
        let mut cached = self.index().await?;
        let current = cached
            .get(id)
            .cloned()
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;
        let head = self
            .get_version_object(&current.head)
            .await?
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;

        let mut props = head.props;
        for key in keys_to_delete {
            props.remove(key);
        }
        patch.remove(ADDED);
        if !patch.contains_key(UPDATED) {
            patch.insert(UPDATED.to_string(), now_timestamp());
        }
        props.extend(patch);

        let new_head = self
            .put_version_object(&VersionObject::new(Some(current.head), props))
            .await?;
        let mut index = cached.clone();
        index.insert(id.to_string(), IndexValue::new(current.added, new_head));
        self.persist(&index).await?;
        *cached = index;
        info!(id, head = %new_head, prev = %current.head, "entry updated");
        Ok(())
    }

    /// The head version object of an entry, `prev` included.
    pub async fn get_entry(&self, id: &str) -> RecordResult<VersionObject> {
        let head = self
            .index()
            .await?
            .get(id)
            .map(|value| value.head)
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;
        self.get_version_object(&head)
            .await?
            .ok_or_else(|| RecordError::NotFound(id.to_string()))
    }

    /// The current props of an entry, merged with its `added` timestamp.
    pub async fn get_props(&self, id: &str) -> RecordResult<Props> {
        let value = self
            .index()
            .await?
            .get(id)
            .cloned()
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;
        let head = self
            .get_version_object(&value.head)
            .await?
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;
        Ok(head.props_with_added(&value.added))
    }

    /// Move an entry to a new identifier. Only the index changes.
    pub async fn rename(&self, old_id: &str, new_id: &str) -> RecordResult<()> {
        let mut cached = self.index().await?;
        if cached.contains_key(new_id) {
            return Err(RecordError::AlreadyExists(new_id.to_string()));
        }
        let mut index = cached.clone();
        let value = index
            .remove(old_id)
            .ok_or_else(|| RecordError::NotFound(old_id.to_string()))?;
        index.insert(new_id.to_string(), value);
        self.persist(&index).await?;
        *cached = index;
        info!(old_id, new_id, "entry renamed");
        Ok(())
    }

    /// Remove an entry and every version object reachable from its head.
    ///
    /// The index save and the chain cleanup run concurrently. Every cleanup
    /// failure is logged; the first error reported is the index save's, if
    /// any, otherwise [`RecordError::ChainCleanupFailed`].
    pub async fn delete(&self, id: &str) -> RecordResult<()> {
        let mut cached = self.index().await?;
        let mut index = cached.clone();
        let value = index
            .remove(id)
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;

        let cleanup = async move {
            let doomed = self.chain_ids(value.head).await?;
            let results = join_all(doomed.iter().map(|cid| self.objects.delete(cid))).await;
            let failures: Vec<String> = doomed
                .iter()
                .zip(results)
                .filter_map(|(cid, result)| result.err().map(|e| format!("{cid}: {e}")))
                .collect();
            Ok::<_, RecordError>((doomed.len(), failures))
        };

        let (saved, cleaned) = futures::join!(self.persist(&index), cleanup);

        let failures = match cleaned {
            Ok((removed, failures)) => {
                debug!(id, removed, "chain cleanup finished");
                failures
            }
            Err(e) => vec![e.to_string()],
        };
        for failure in &failures {
            warn!(id, %failure, "version object not removed");
        }

        saved?;
        *cached = index;
        if !failures.is_empty() {
            return Err(RecordError::ChainCleanupFailed {
                id: id.to_string(),
                failures,
            });
        }
        info!(id, "entry deleted");
        Ok(())
    }

    /// Entry identifiers, optionally filtered by a case-insensitive
    /// substring, in lexicographic order.
    pub async fn list(&self, filter: Option<&str>) -> RecordResult<Vec<String>> {
        let needle = filter.map(str::to_lowercase);
        let index = self.index().await?;
        Ok(index
            .keys()
            .filter(|id| {
                needle
                    .as_deref()
                    .map_or(true, |needle| id.to_lowercase().contains(needle))
            })
            .cloned()
            .collect())
    }

    /// Every reachable version of an entry, newest first.
    pub async fn history(&self, id: &str) -> RecordResult<Vec<VersionObject>> {
        let head = self
            .index()
            .await?
            .get(id)
            .map(|value| value.head)
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;
        let chain = self.walk_chain(head).await?;
        if chain.is_empty() {
            return Err(RecordError::NotFound(id.to_string()));
        }
        Ok(chain.into_iter().map(|(_, version)| version).collect())
    }

    /// Walk `head → prev → …`, stopping at an absent `prev` or at the first
    /// object that cannot be loaded.
    pub async fn walk_chain(&self, head: ContentId) -> RecordResult<Vec<(ContentId, VersionObject)>> {
        let mut chain = Vec::new();
        let mut next = Some(head);
        while let Some(cid) = next {
            match self.get_version_object(&cid).await? {
                Some(version) => {
                    next = version.prev;
                    chain.push((cid, version));
                }
                None => {
                    warn!(%cid, generation = chain.len(), "chain ends at unreadable object");
                    break;
                }
            }
        }
        Ok(chain)
    }

    /// Ids to delete for a chain: every loadable version plus the first
    /// unloadable one, which may be a half-deleted leftover.
    async fn chain_ids(&self, head: ContentId) -> RecordResult<Vec<ContentId>> {
        let mut ids = Vec::new();
        let mut next = Some(head);
        while let Some(cid) = next {
            ids.push(cid);
            next = self
                .get_version_object(&cid)
                .await?
                .and_then(|version| version.prev);
        }
        Ok(ids)
    }
}
