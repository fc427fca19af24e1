use async_trait::async_trait;
use bytes::Bytes;
use fragments_types::{FragmentId, FragmentRecord, OwnerId};

use crate::error::{StoreError, StoreResult};

/// Persistence contract for fragment metadata and data.
///
/// All implementations must satisfy these invariants:
/// - Metadata and data are keyed by the same `(owner, id)` pair.
/// - `list_ids` / `list_records` return an owner's fragments in insertion
///   order; an owner with no fragments yields an empty list.
/// - Writes to a single key are linearizable.
/// - `delete_all` reports whether anything existed.
/// - All backend errors are propagated, never silently ignored.
#[async_trait]
pub trait FragmentStore: Send + Sync {
    /// Upsert the metadata record for a key.
    async fn put_metadata(
        &self,
        owner: &OwnerId,
        id: &FragmentId,
        record: &FragmentRecord,
    ) -> StoreResult<()>;

    /// Read the metadata record for a key. `Ok(None)` if absent.
    async fn get_metadata(
        &self,
        owner: &OwnerId,
        id: &FragmentId,
    ) -> StoreResult<Option<FragmentRecord>>;

    /// Fragment ids of an owner, in insertion order.
    async fn list_ids(&self, owner: &OwnerId) -> StoreResult<Vec<FragmentId>>;

    /// Full metadata records of an owner, in insertion order.
    async fn list_records(&self, owner: &OwnerId) -> StoreResult<Vec<FragmentRecord>>;

    /// Replace the raw data for a key.
    async fn put_data(&self, owner: &OwnerId, id: &FragmentId, data: Bytes) -> StoreResult<()>;

    /// Read the raw data for a key. `Ok(None)` if no bytes were written.
    async fn get_data(&self, owner: &OwnerId, id: &FragmentId) -> StoreResult<Option<Bytes>>;

    /// Remove both metadata and data for a key. Returns `true` if either
    /// existed.
    async fn delete_all(&self, owner: &OwnerId, id: &FragmentId) -> StoreResult<bool>;

    /// Write data and metadata for a key as one step.
    ///
    /// The default implementation writes the data, then the metadata. If the
    /// metadata write fails, the key goes back to what it held before: a key
    /// that held nothing is deleted, otherwise the previous bytes are put
    /// back. It is not atomic against concurrent readers; callers serialize
    /// per key. Backends that can commit both in one operation should
    /// override it.
    async fn put_fragment(&self, record: &FragmentRecord, data: Bytes) -> StoreResult<()> {
        let owner = &record.owner_id;
        let id = &record.id;
        let previous_record = self.get_metadata(owner, id).await?;
        let previous_data = self.get_data(owner, id).await?;
        self.put_data(owner, id, data).await?;
        if let Err(err) = self.put_metadata(owner, id, record).await {
            tracing::warn!(%owner, %id, error = %err, "metadata write failed, rolling back data");
            match (previous_record, previous_data) {
                (None, None) => {
                    self.delete_all(owner, id).await?;
                }
                // Metadata without data only exists for empty fragments.
                (Some(_), None) => self.put_data(owner, id, Bytes::new()).await?,
                (_, Some(previous)) => self.put_data(owner, id, previous).await?,
            }
            return Err(err);
        }
        Ok(())
    }
}

/// Reject a record whose own key differs from the key it is written under.
pub fn check_key(owner: &OwnerId, id: &FragmentId, record: &FragmentRecord) -> StoreResult<()> {
    if &record.owner_id != owner || &record.id != id {
        return Err(StoreError::KeyMismatch {
            owner: owner.clone(),
            id: id.clone(),
            record_owner: record.owner_id.clone(),
            record_id: record.id.clone(),
        });
    }
    Ok(())
}
