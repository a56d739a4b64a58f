//! EntityStore implementation
//!
//! Generic over the payload type: one store instance manages one entity
//! type's directory. The class-per-entity-type pattern of similar systems is
//! replaced by a single generic implementation parameterized by [`Entity`].

use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::atomic::{self, write_atomic};
use crate::codec;
use crate::error::{CardfileError, Result};
use crate::record::{Entity, IdGenerator, Record, RecordId, UuidGenerator};

use super::RECORD_EXT;

/// File-backed store for one entity type
///
/// All methods take `&self`; the store itself holds no mutable state. Write
/// serialization across create/update/delete is the collection facade's job.
pub struct EntityStore<E: Entity> {
    /// Directory holding this entity type's record files
    root: PathBuf,

    /// Id generator collaborator (UUID v4 unless injected)
    ids: Arc<dyn IdGenerator>,

    _entity: PhantomData<E>,
}

impl<E: Entity> EntityStore<E> {
    /// Open or create the store under `data_dir`
    ///
    /// Creates `{data_dir}/{KIND}/` if it does not exist.
    pub fn open(data_dir: &Path) -> Result<Self> {
        Self::with_id_generator(data_dir, Arc::new(UuidGenerator))
    }

    /// Open with an injected id generator
    pub fn with_id_generator(data_dir: &Path, ids: Arc<dyn IdGenerator>) -> Result<Self> {
        let root = data_dir.join(E::KIND);
        fs::create_dir_all(&root)?;

        Ok(Self {
            root,
            ids,
            _entity: PhantomData,
        })
    }

    /// Create a new record from `payload`
    ///
    /// Generates a fresh id, stamps timestamps, and writes the record
    /// atomically. Never partially succeeds: on write failure no file
    /// exists at the record path.
    pub fn create(&self, payload: E) -> Result<Record<E>> {
        let id = self.ids.next_id();
        let path = self.record_path(&id);

        // Guarded duplicate check; the generator makes this unreachable in
        // practice
        if path.exists() {
            return Err(CardfileError::already_exists(id.as_str()));
        }

        let record = Record::new(id, payload);
        let bytes = codec::to_bytes(&record)?;
        write_atomic(&path, &bytes)?;

        tracing::debug!("created {} record {}", E::KIND, record.id);
        Ok(record)
    }

    /// Read a record by id
    ///
    /// Returns:
    /// - `Ok(record)` — file present and decodable
    /// - `Err(NotFound)` — no file at the record path
    /// - `Err(CorruptRecord)` — file present but undecodable
    pub fn read(&self, id: &RecordId) -> Result<Record<E>> {
        let path = self.record_path(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CardfileError::not_found(id.as_str()));
            }
            Err(e) => return Err(e.into()),
        };

        codec::from_bytes(&bytes).map_err(|source| CardfileError::CorruptRecord { path, source })
    }

    /// Overwrite an existing record's payload
    ///
    /// Preserves the id and `created_at`, refreshes `updated_at`, and writes
    /// through the same atomic path as `create`. Fails with `NotFound` if
    /// the id does not exist.
    pub fn update(&self, id: &RecordId, payload: E) -> Result<Record<E>> {
        let existing = self.read(id)?;
        let record = existing.succeed(payload);

        let bytes = codec::to_bytes(&record)?;
        write_atomic(&self.record_path(id), &bytes)?;

        tracing::debug!("updated {} record {}", E::KIND, id);
        Ok(record)
    }

    /// Delete a record by id
    pub fn delete(&self, id: &RecordId) -> Result<()> {
        match fs::remove_file(self.record_path(id)) {
            Ok(()) => {
                tracing::debug!("deleted {} record {}", E::KIND, id);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(CardfileError::not_found(id.as_str()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Enumerate every record currently on disk
    ///
    /// Order is filesystem enumeration order — callers must not rely on it
    /// for anything beyond completeness. Temp/hidden files are ignored;
    /// records that fail to decode are logged and skipped so enumeration
    /// (and index rebuild on top of it) degrades gracefully.
    pub fn list_all(&self) -> Result<Vec<Record<E>>> {
        let mut records = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || !Self::is_record_file(&path) {
                continue;
            }

            let bytes = fs::read(&path)?;
            match codec::from_bytes::<Record<E>>(&bytes) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("skipping corrupt {} record {}: {}", E::KIND, path.display(), e);
                }
            }
        }

        Ok(records)
    }

    /// Check whether a record exists without decoding it
    pub fn contains(&self, id: &RecordId) -> bool {
        self.record_path(id).is_file()
    }

    /// Directory holding this entity type's record files
    pub fn root(&self) -> &Path {
        &self.root
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// File path for a record id: `{root}/{id}.rec`
    fn record_path(&self, id: &RecordId) -> PathBuf {
        self.root.join(format!("{}.{}", id, RECORD_EXT))
    }

    /// True for `{id}.rec` files, false for temp/hidden/foreign files
    fn is_record_file(path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(atomic::is_hidden);

        !hidden && path.extension().and_then(|e| e.to_str()) == Some(RECORD_EXT)
    }
}
