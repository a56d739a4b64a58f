//! Index partition file
//!
//! The physical unit of an index: one file holding a mapping from full
//! normalized key to its posting set. Both index strategies share this
//! representation and differ only in how they pick the partition file for a
//! key.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::atomic::write_atomic;
use crate::codec;
use crate::error::{CardfileError, Result};
use crate::record::RecordId;

/// In-memory form of one partition file
///
/// Ordered containers keep the serialized form deterministic: rebuilding an
/// index twice produces byte-identical partitions.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Partition {
    entries: BTreeMap<String, BTreeSet<RecordId>>,
}

impl Partition {
    /// Load a partition from disk
    ///
    /// A missing file is an empty partition (partitions are created lazily
    /// and may legitimately be left empty by removals). A present but
    /// undecodable file is `CorruptIndex`.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        codec::from_bytes(&bytes).map_err(|source| CardfileError::CorruptIndex {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the partition back atomically
    pub fn store(&self, path: &Path) -> Result<()> {
        let bytes = codec::to_bytes(self)?;
        write_atomic(path, &bytes)
    }

    /// Add `id` under `key`; returns false if it was already present
    pub fn insert(&mut self, key: &str, id: &RecordId) -> bool {
        self.entries
            .entry(key.to_string())
            .or_default()
            .insert(id.clone())
    }

    /// Remove `id` from under `key`; returns false if nothing changed
    ///
    /// A posting emptied by the removal is dropped entirely.
    pub fn remove(&mut self, key: &str, id: &RecordId) -> bool {
        let Some(posting) = self.entries.get_mut(key) else {
            return false;
        };

        let removed = posting.remove(id);
        if posting.is_empty() {
            self.entries.remove(key);
        }
        removed
    }

    /// Posting set for an exact key, empty if absent
    pub fn get(&self, key: &str) -> BTreeSet<RecordId> {
        self.entries.get(key).cloned().unwrap_or_default()
    }

    /// Union into `out` every posting whose key starts with `prefix`
    pub fn collect_prefix(&self, prefix: &str, out: &mut BTreeSet<RecordId>) {
        for (key, posting) in self.entries.range(prefix.to_string()..) {
            if !key.starts_with(prefix) {
                break;
            }
            out.extend(posting.iter().cloned());
        }
    }
}
