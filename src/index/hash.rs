//! Hash Index
//!
//! Exact-match search over a string field via hash partitioning: the
//! partition file for a value is its SHA-256 bucket modulo a fixed partition
//! count, so a query loads exactly one file and the per-file entry count
//! stays balanced regardless of dataset size.
//!
//! SHA-256 rather than a runtime hasher because bucket assignment is
//! persisted: the same value must land in the same partition across
//! processes and restarts.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::record::RecordId;

use super::{normalize, Partition, PARTITION_EXT};

/// Hash-partitioned exact-match index over one field
pub struct HashIndex {
    /// Field directory: `{index_dir}/{entity_type}/{field}`
    root: PathBuf,

    /// Fixed bucket count, stable for the lifetime of the store directory
    partitions: u32,
}

impl HashIndex {
    /// Open or create the index directory
    pub fn open(field_dir: PathBuf, partitions: u32) -> Result<Self> {
        fs::create_dir_all(&field_dir)?;
        Ok(Self {
            root: field_dir,
            partitions: partitions.max(1),
        })
    }

    /// Add `id` under `value`
    ///
    /// Values that normalize to empty are not indexed. Re-adding an id that
    /// is already posted is a no-op and writes nothing.
    pub fn add(&self, value: &str, id: &RecordId) -> Result<()> {
        let key = normalize(value);
        if key.is_empty() {
            return Ok(());
        }

        let path = self.partition_path(&key);
        let mut partition = Partition::load(&path)?;

        if partition.insert(&key, id) {
            partition.store(&path)?;
        }
        Ok(())
    }

    /// Remove `id` from under `value`
    pub fn remove(&self, value: &str, id: &RecordId) -> Result<()> {
        let key = normalize(value);
        if key.is_empty() {
            return Ok(());
        }

        let path = self.partition_path(&key);
        let mut partition = Partition::load(&path)?;

        if partition.remove(&key, id) {
            partition.store(&path)?;
        }
        Ok(())
    }

    /// All record ids posted under exactly `value`
    ///
    /// Loads one partition. Bucket collisions are resolved by the exact-key
    /// lookup inside the partition map — never by cross-partition search.
    pub fn query_exact(&self, value: &str) -> Result<BTreeSet<RecordId>> {
        let key = normalize(value);
        if key.is_empty() {
            return Ok(BTreeSet::new());
        }

        let partition = Partition::load(&self.partition_path(&key))?;
        Ok(partition.get(&key))
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// `{root}/{bucket:03}.idx`
    fn partition_path(&self, key: &str) -> PathBuf {
        let bucket = self.bucket(key);
        self.root.join(format!("{:03}.{}", bucket, PARTITION_EXT))
    }

    /// First 8 digest bytes as big-endian u64, modulo the partition count
    fn bucket(&self, key: &str) -> u32 {
        let digest = Sha256::digest(key.as_bytes());
        let head = u64::from_be_bytes(digest[..8].try_into().unwrap());
        (head % u64::from(self.partitions)) as u32
    }
}
