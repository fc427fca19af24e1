use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use bytes::Bytes;
use fragments_types::{FragmentId, FragmentRecord, OwnerId};

use crate::error::{StoreError, StoreResult};
use crate::traits::{check_key, FragmentStore};

/// In-memory, HashMap-based fragment store.
///
/// Intended for tests and embedding. All state sits behind one `RwLock`, so
/// every operation (including [`FragmentStore::put_fragment`]) is atomic.
/// Records are cloned on read/write; data blobs are reference-counted.
pub struct InMemoryFragmentStore {
    owners: RwLock<HashMap<OwnerId, Shelf>>,
}

/// One owner's fragments, remembering insertion order.
#[derive(Default)]
struct Shelf {
    order: Vec<FragmentId>,
    entries: HashMap<FragmentId, Entry>,
}

#[derive(Default)]
struct Entry {
    record: Option<FragmentRecord>,
    data: Option<Bytes>,
}

impl Shelf {
    fn entry_mut(&mut self, id: &FragmentId) -> &mut Entry {
        if !self.entries.contains_key(id) {
            self.order.push(id.clone());
        }
        self.entries.entry(id.clone()).or_default()
    }

    fn records(&self) -> impl Iterator<Item = &FragmentRecord> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .filter_map(|entry| entry.record.as_ref())
    }

    fn remove(&mut self, id: &FragmentId) -> bool {
        match self.entries.remove(id) {
            Some(entry) => {
                self.order.retain(|existing| existing != id);
                entry.record.is_some() || entry.data.is_some()
            }
            None => false,
        }
    }
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Poisoned
}

impl InMemoryFragmentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            owners: RwLock::new(HashMap::new()),
        }
    }

    /// Number of fragments with metadata, across all owners.
    pub fn len(&self) -> usize {
        let owners = self.owners.read().unwrap_or_else(PoisonError::into_inner);
        owners.values().map(|shelf| shelf.records().count()).sum()
    }

    /// Returns `true` if no fragment metadata is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes of data across all fragments.
    pub fn total_bytes(&self) -> u64 {
        let owners = self.owners.read().unwrap_or_else(PoisonError::into_inner);
        owners
            .values()
            .flat_map(|shelf| shelf.entries.values())
            .filter_map(|entry| entry.data.as_ref())
            .map(|data| data.len() as u64)
            .sum()
    }

    /// Remove everything from the store. An empty store is consistent, so
    /// this also lifts any lock poisoning left by a panicked writer.
    pub fn clear(&self) {
        let mut owners = self.owners.write().unwrap_or_else(PoisonError::into_inner);
        owners.clear();
        drop(owners);
        self.owners.clear_poison();
    }
}

impl Default for InMemoryFragmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FragmentStore for InMemoryFragmentStore {
    async fn put_metadata(
        &self,
        owner: &OwnerId,
        id: &FragmentId,
        record: &FragmentRecord,
    ) -> StoreResult<()> {
        check_key(owner, id, record)?;
        let mut owners = self.owners.write().map_err(poisoned)?;
        let shelf = owners.entry(owner.clone()).or_default();
        shelf.entry_mut(id).record = Some(record.clone());
        Ok(())
    }

    async fn get_metadata(
        &self,
        owner: &OwnerId,
        id: &FragmentId,
    ) -> StoreResult<Option<FragmentRecord>> {
        let owners = self.owners.read().map_err(poisoned)?;
        Ok(owners
            .get(owner)
            .and_then(|shelf| shelf.entries.get(id))
            .and_then(|entry| entry.record.clone()))
    }

    async fn list_ids(&self, owner: &OwnerId) -> StoreResult<Vec<FragmentId>> {
        let owners = self.owners.read().map_err(poisoned)?;
        Ok(owners
            .get(owner)
            .map(|shelf| shelf.records().map(|record| record.id.clone()).collect())
            .unwrap_or_default())
    }

    async fn list_records(&self, owner: &OwnerId) -> StoreResult<Vec<FragmentRecord>> {
        let owners = self.owners.read().map_err(poisoned)?;
        Ok(owners
            .get(owner)
            .map(|shelf| shelf.records().cloned().collect())
            .unwrap_or_default())
    }

    async fn put_data(&self, owner: &OwnerId, id: &FragmentId, data: Bytes) -> StoreResult<()> {
        let mut owners = self.owners.write().map_err(poisoned)?;
        let shelf = owners.entry(owner.clone()).or_default();
        shelf.entry_mut(id).data = Some(data);
        Ok(())
    }

    async fn get_data(&self, owner: &OwnerId, id: &FragmentId) -> StoreResult<Option<Bytes>> {
        let owners = self.owners.read().map_err(poisoned)?;
        Ok(owners
            .get(owner)
            .and_then(|shelf| shelf.entries.get(id))
            .and_then(|entry| entry.data.clone()))
    }

    async fn delete_all(&self, owner: &OwnerId, id: &FragmentId) -> StoreResult<bool> {
        let mut owners = self.owners.write().map_err(poisoned)?;
        let Some(shelf) = owners.get_mut(owner) else {
            return Ok(false);
        };
        let existed = shelf.remove(id);
        if shelf.entries.is_empty() {
            owners.remove(owner);
        }
        Ok(existed)
    }

    async fn put_fragment(&self, record: &FragmentRecord, data: Bytes) -> StoreResult<()> {
        let mut owners = self.owners.write().map_err(poisoned)?;
        let shelf = owners.entry(record.owner_id.clone()).or_default();
        let entry = shelf.entry_mut(&record.id);
        entry.data = Some(data);
        entry.record = Some(record.clone());
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryFragmentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryFragmentStore")
            .field("fragment_count", &self.len())
            .field("total_bytes", &self.total_bytes())
            .finish()
    }
}
