//! Set storage
//!
//! `SetStore` is the seam between the HTTP handlers and persistence.
//! `MemorySetStore` keeps everything in a `BTreeMap`; see `sqlite` for the
//! file-backed implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::error::{SetStoreError, SetStoreResult};
use super::types::{NewSet, Set, SetId};

/// Read/write access to stored sets
///
/// Implementations assign ids on `add` and return sets from `list` in
/// ascending id order. Callers validate input before it reaches the store.
pub trait SetStore: Send + Sync {
    /// Store a new set and return it with its assigned id
    fn add(&self, new: NewSet) -> SetStoreResult<Set>;

    /// All stored sets, oldest first
    fn list(&self) -> SetStoreResult<Vec<Set>>;

    /// Look up one set
    fn get(&self, id: SetId) -> SetStoreResult<Set>;

    /// Replace the values of an existing set
    fn update(&self, id: SetId, update: NewSet) -> SetStoreResult<Set>;

    /// Remove a set
    fn delete(&self, id: SetId) -> SetStoreResult<()>;

    /// Number of stored sets
    fn count(&self) -> SetStoreResult<usize> {
        Ok(self.list()?.len())
    }
}

/// In-process set store
pub struct MemorySetStore {
    inner: RwLock<MemoryInner>,
}

struct MemoryInner {
    next_id: u64,
    sets: BTreeMap<SetId, Set>,
}

impl Default for MemorySetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySetStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryInner {
                next_id: 1,
                sets: BTreeMap::new(),
            }),
        }
    }

    /// Build a store pre-populated with the given sets
    pub fn with_sets(sets: impl IntoIterator<Item = NewSet>) -> SetStoreResult<Self> {
        let store = Self::new();
        for set in sets {
            store.add(set)?;
        }
        Ok(store)
    }

    fn read(&self) -> SetStoreResult<std::sync::RwLockReadGuard<'_, MemoryInner>> {
        self.inner
            .read()
            .map_err(|e| SetStoreError::Lock(e.to_string()))
    }

    fn write(&self) -> SetStoreResult<std::sync::RwLockWriteGuard<'_, MemoryInner>> {
        self.inner
            .write()
            .map_err(|e| SetStoreError::Lock(e.to_string()))
    }
}

impl SetStore for MemorySetStore {
    fn add(&self, new: NewSet) -> SetStoreResult<Set> {
        let mut inner = self.write()?;
        let id = SetId(inner.next_id);
        inner.next_id += 1;

        let set = Set::from_new(id, new);
        inner.sets.insert(id, set.clone());

        tracing::debug!(set_id = %id, "Stored set");
        Ok(set)
    }

    fn list(&self) -> SetStoreResult<Vec<Set>> {
        Ok(self.read()?.sets.values().cloned().collect())
    }

    fn get(&self, id: SetId) -> SetStoreResult<Set> {
        self.read()?
            .sets
            .get(&id)
            .cloned()
            .ok_or(SetStoreError::NotFound(id))
    }

    fn update(&self, id: SetId, update: NewSet) -> SetStoreResult<Set> {
        let mut inner = self.write()?;
        let set = inner.sets.get_mut(&id).ok_or(SetStoreError::NotFound(id))?;
        set.apply(update);
        Ok(set.clone())
    }

    fn delete(&self, id: SetId) -> SetStoreResult<()> {
        self.write()?
            .sets
            .remove(&id)
            .map(|_| ())
            .ok_or(SetStoreError::NotFound(id))
    }

    fn count(&self) -> SetStoreResult<usize> {
        Ok(self.read()?.sets.len())
    }
}
