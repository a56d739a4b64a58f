//! Generic collection
//!
//! One implementation of the store+index composition, shared by every domain
//! book. Holds the per-entity-type mutation lock.

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{CardfileError, Result};
use crate::index::{Indexable, IndexManager};
use crate::record::{Entity, Record, RecordId};
use crate::store::EntityStore;

/// Entity store + index manager + mutation lock for one entity type
pub(crate) struct Collection<E: Entity + Indexable> {
    store: EntityStore<E>,
    indexes: IndexManager<E>,

    /// Serializes create/update/delete so the store-write/index-update pair
    /// runs as one unit; queries take no lock
    write_lock: Mutex<()>,
}

impl<E: Entity + Indexable> Collection<E> {
    /// Open or create the collection under the configured root
    pub fn open(config: &Config) -> Result<Self> {
        let store = EntityStore::open(&config.data_dir())?;
        let indexes = IndexManager::open(&config.index_dir(), config.hash_partitions)?;

        Ok(Self {
            store,
            indexes,
            write_lock: Mutex::new(()),
        })
    }

    // =========================================================================
    // Mutations (store first, then indexes)
    // =========================================================================

    /// Persist a new record, then index it
    pub fn add(&self, payload: E) -> Result<Record<E>> {
        let _guard = self.write_lock.lock();

        let record = self.store.create(payload)?;
        self.indexes.on_create(&record)?;
        Ok(record)
    }

    /// Overwrite an existing record, then re-index the changed fields
    pub fn update(&self, id: &RecordId, payload: E) -> Result<Record<E>> {
        let _guard = self.write_lock.lock();

        let old = self.store.read(id)?;
        let new = self.store.update(id, payload)?;
        self.indexes.on_update(&old, &new)?;
        Ok(new)
    }

    /// Delete a record, then drop its postings
    pub fn remove(&self, id: &RecordId) -> Result<Record<E>> {
        let _guard = self.write_lock.lock();

        let record = self.store.read(id)?;
        self.store.delete(id)?;
        self.indexes.on_delete(&record)?;
        Ok(record)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Read one record by id
    pub fn get(&self, id: &RecordId) -> Result<Record<E>> {
        self.store.read(id)
    }

    /// Every record currently stored, in unspecified order
    pub fn list(&self) -> Result<Vec<Record<E>>> {
        self.store.list_all()
    }

    // =========================================================================
    // Indexed Queries
    // =========================================================================

    /// Records whose `field` value starts with `prefix`
    pub fn search_prefix(&self, field: &str, prefix: &str) -> Result<Vec<Record<E>>> {
        let ids = self.query_with_repair(|| self.indexes.query_prefix(field, prefix))?;
        self.hydrate(ids)
    }

    /// Records with exactly the given `field` value
    pub fn search_exact(&self, field: &str, value: &str) -> Result<Vec<Record<E>>> {
        let ids = self.query_with_repair(|| self.indexes.query_exact(field, value))?;
        self.hydrate(ids)
    }

    /// Rebuild every index of this entity type from the store
    pub fn rebuild_indexes(&self) -> Result<usize> {
        let _guard = self.write_lock.lock();
        self.indexes.rebuild(&self.store)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Run an index query; on `CorruptIndex`, rebuild once and retry once
    ///
    /// A second failure is surfaced. `StorageFailure` is never retried.
    fn query_with_repair<T>(&self, query: impl Fn() -> Result<T>) -> Result<T> {
        match query() {
            Err(CardfileError::CorruptIndex { path, source }) => {
                tracing::warn!(
                    "corrupt index partition {} ({}), rebuilding {} indexes",
                    path.display(),
                    source,
                    E::KIND
                );
                self.rebuild_indexes()?;
                query()
            }
            other => other,
        }
    }

    /// Load full records for matched ids
    ///
    /// A posting pointing at a record that no longer exists (stale index,
    /// e.g. after a crash between data write and index update) is skipped,
    /// not an error. Zero matches produce an empty vec.
    fn hydrate(&self, ids: impl IntoIterator<Item = RecordId>) -> Result<Vec<Record<E>>> {
        let mut records = Vec::new();

        for id in ids {
            match self.store.read(&id) {
                Ok(record) => records.push(record),
                Err(CardfileError::NotFound { id }) => {
                    tracing::debug!("skipping stale {} posting for {}", E::KIND, id);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(records)
    }
}
