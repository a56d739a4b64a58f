//! Index Manager
//!
//! Coordinates the index instances registered for one entity type and keeps
//! them in step with store mutations.
//!
//! ## Responsibilities
//! - Open one index per entry in the payload's index plan
//! - Mirror create/update/delete mutations into every registered index
//! - Rebuild all indexes from the store's authoritative data
//!
//! ## Ordering
//! The collection facade runs the store mutation to completion before the
//! matching hook here. A crash between the two leaves indexes stale but the
//! primary data intact; `rebuild` is the recovery path and is idempotent.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::record::{Entity, Record, RecordId};
use crate::store::EntityStore;

use super::{FieldSpec, HashIndex, Indexable, IndexKind, PrefixIndex};

/// One opened index and the field it covers
enum FieldIndex {
    Prefix(FieldSpec, PrefixIndex),
    Hash(FieldSpec, HashIndex),
}

impl FieldIndex {
    fn spec(&self) -> &FieldSpec {
        match self {
            FieldIndex::Prefix(spec, _) | FieldIndex::Hash(spec, _) => spec,
        }
    }

    fn add(&self, value: &str, id: &RecordId) -> Result<()> {
        match self {
            FieldIndex::Prefix(_, index) => index.add(value, id),
            FieldIndex::Hash(_, index) => index.add(value, id),
        }
    }

    fn remove(&self, value: &str, id: &RecordId) -> Result<()> {
        match self {
            FieldIndex::Prefix(_, index) => index.remove(value, id),
            FieldIndex::Hash(_, index) => index.remove(value, id),
        }
    }
}

/// All indexes registered for one entity type
pub struct IndexManager<E> {
    /// Entity type index directory: `{index_dir}/{KIND}`
    root: PathBuf,

    indexes: Vec<FieldIndex>,

    _entity: PhantomData<E>,
}

impl<E: Entity + Indexable> IndexManager<E> {
    /// Open one index per entry in the payload's index plan
    pub fn open(index_dir: &Path, hash_partitions: u32) -> Result<Self> {
        let root = index_dir.join(E::KIND);

        let mut indexes = Vec::new();
        for spec in E::index_plan() {
            indexes.push(Self::open_field(&root, *spec, hash_partitions)?);
        }

        Ok(Self {
            root,
            indexes,
            _entity: PhantomData,
        })
    }

    // =========================================================================
    // Mutation Hooks
    // =========================================================================

    /// Index every registered field of a freshly created record
    pub fn on_create(&self, record: &Record<E>) -> Result<()> {
        for index in &self.indexes {
            for value in record.payload.values_for(index.spec().name) {
                index.add(&value, &record.id)?;
            }
        }
        Ok(())
    }

    /// Re-index the fields whose values changed between `old` and `new`
    ///
    /// Per field: postings for vanished values are removed, postings for new
    /// values added. A field whose value set is unchanged touches no file.
    pub fn on_update(&self, old: &Record<E>, new: &Record<E>) -> Result<()> {
        for index in &self.indexes {
            let field = index.spec().name;
            let before = old.payload.values_for(field);
            let after = new.payload.values_for(field);

            if before == after {
                continue;
            }

            for value in before.iter().filter(|v| !after.contains(v)) {
                index.remove(value, &new.id)?;
            }
            for value in after.iter().filter(|v| !before.contains(v)) {
                index.add(value, &new.id)?;
            }
        }
        Ok(())
    }

    /// Drop every posting referencing a deleted record
    pub fn on_delete(&self, record: &Record<E>) -> Result<()> {
        for index in &self.indexes {
            for value in record.payload.values_for(index.spec().name) {
                index.remove(&value, &record.id)?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Prefix query against the named field's index
    pub fn query_prefix(&self, field: &str, prefix: &str) -> Result<BTreeSet<RecordId>> {
        match self.field_index(field) {
            Some(FieldIndex::Prefix(_, index)) => index.query(prefix),
            _ => Err(unindexed(field, E::KIND, IndexKind::Prefix)),
        }
    }

    /// Exact-match query against the named field's index
    pub fn query_exact(&self, field: &str, value: &str) -> Result<BTreeSet<RecordId>> {
        match self.field_index(field) {
            Some(FieldIndex::Hash(_, index)) => index.query_exact(value),
            _ => Err(unindexed(field, E::KIND, IndexKind::Hash)),
        }
    }

    // =========================================================================
    // Rebuild
    // =========================================================================

    /// Discard all partitions and re-derive them from the store
    ///
    /// The designated recovery path for a missing, stale, or corrupt index;
    /// safe to call at any time, and running it twice in a row produces
    /// identical partition content. Returns the number of records reindexed.
    pub fn rebuild(&self, store: &EntityStore<E>) -> Result<usize> {
        // Clear: remove each field directory wholesale; partitions are
        // recreated lazily as postings come back
        for index in &self.indexes {
            let field_dir = self.root.join(index.spec().name);

            match fs::remove_dir_all(&field_dir) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            fs::create_dir_all(&field_dir)?;
        }

        // Re-derive from the authoritative data
        let records = store.list_all()?;
        for record in &records {
            self.on_create(record)?;
        }

        tracing::info!("rebuilt {} indexes over {} records", E::KIND, records.len());
        Ok(records.len())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn open_field(root: &Path, spec: FieldSpec, hash_partitions: u32) -> Result<FieldIndex> {
        let field_dir = root.join(spec.name);
        Ok(match spec.kind {
            IndexKind::Prefix => FieldIndex::Prefix(spec, PrefixIndex::open(field_dir)?),
            IndexKind::Hash => FieldIndex::Hash(spec, HashIndex::open(field_dir, hash_partitions)?),
        })
    }

    fn field_index(&self, field: &str) -> Option<&FieldIndex> {
        self.indexes.iter().find(|i| i.spec().name == field)
    }
}

/// Error for a query against a field the plan does not cover that way
fn unindexed(field: &str, kind: &str, strategy: IndexKind) -> crate::error::CardfileError {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("no {strategy:?} index registered for {kind} field `{field}`"),
    )
    .into()
}
