//! Prefix Index
//!
//! Prefix search over a string field via two-level trie partitioning: the
//! partition file for a value is addressed by its first and second
//! normalized characters, so a prefix query of length ≥ 2 loads exactly one
//! file regardless of total record count.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::record::RecordId;

use super::{normalize, Partition, PARTITION_EXT};

/// Directory for values shorter than two characters
const SHORT_DIR: &str = "_short";

/// Two-level partitioned prefix index over one field
pub struct PrefixIndex {
    /// Field directory: `{index_dir}/{entity_type}/{field}`
    root: PathBuf,
}

impl PrefixIndex {
    /// Open or create the index directory
    pub fn open(field_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&field_dir)?;
        Ok(Self { root: field_dir })
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
    ///
    /// Removing an absent posting is a no-op. The partition file may be left
    /// empty on disk; loads tolerate that.
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

    /// All record ids whose indexed value starts with `prefix`
    ///
    /// Length ≥ 2 loads the single matching two-level partition. Length 1
    /// falls back to scanning the short-value partition plus every
    /// second-level partition under the first character — more file loads,
    /// still correct. An empty prefix matches nothing.
    pub fn query(&self, prefix: &str) -> Result<BTreeSet<RecordId>> {
        let prefix = normalize(prefix);
        let mut ids = BTreeSet::new();

        let mut chars = prefix.chars();
        let (Some(first), second) = (chars.next(), chars.next()) else {
            return Ok(ids);
        };

        match second {
            Some(second) => {
                // A prefix of length >= 2 can only match values of length
                // >= 2, and those all live in this one partition
                let path = self.two_level_path(first, second);
                Partition::load(&path)?.collect_prefix(&prefix, &mut ids);
            }
            None => {
                let short = self.short_path(first);
                Partition::load(&short)?.collect_prefix(&prefix, &mut ids);
                self.scan_first_level(first, &prefix, &mut ids)?;
            }
        }

        Ok(ids)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Partition file for a normalized value
    fn partition_path(&self, key: &str) -> PathBuf {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(first), Some(second)) => self.two_level_path(first, second),
            (Some(first), None) => self.short_path(first),
            // Unreachable: callers filter empty keys
            (None, _) => self.root.join(SHORT_DIR).join(format!("_.{PARTITION_EXT}")),
        }
    }

    /// `{root}/{p1}/{p2}.idx`
    fn two_level_path(&self, first: char, second: char) -> PathBuf {
        self.root
            .join(component(first))
            .join(format!("{}.{}", component(second), PARTITION_EXT))
    }

    /// `{root}/_short/{p1}.idx`
    fn short_path(&self, first: char) -> PathBuf {
        self.root
            .join(SHORT_DIR)
            .join(format!("{}.{}", component(first), PARTITION_EXT))
    }

    /// Union postings from every second-level partition under `first`
    fn scan_first_level(
        &self,
        first: char,
        prefix: &str,
        out: &mut BTreeSet<RecordId>,
    ) -> Result<()> {
        let dir = self.root.join(component(first));

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        for entry in entries {
            let path = entry?.path();
            if is_partition_file(&path) {
                Partition::load(&path)?.collect_prefix(prefix, out);
            }
        }
        Ok(())
    }
}

/// Map a key character to a safe path component
///
/// Alphanumerics are used verbatim; anything else becomes its hex codepoint
/// so arbitrary field values cannot escape the index directory.
fn component(c: char) -> String {
    if c.is_alphanumeric() {
        c.to_string()
    } else {
        format!("x{:x}", c as u32)
    }
}

fn is_partition_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(PARTITION_EXT)
}
