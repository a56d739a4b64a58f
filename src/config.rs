//! Configuration for cardfile
//!
//! Centralized configuration with sensible defaults. A `Config` value is
//! passed explicitly into each collection facade at construction — there is
//! no process-wide state.

use std::path::PathBuf;

/// Default number of hash-index partitions.
///
/// Fixed per store directory: bucket assignment is persisted on disk, so
/// changing the count for an existing store requires an index rebuild.
pub const DEFAULT_HASH_PARTITIONS: u32 = 64;

/// Main configuration for a cardfile store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all files.
    /// Internal structure:
    ///   {root_dir}/
    ///     ├── data/{entity_type}/{id}.rec        (one record per file)
    ///     └── index/{entity_type}/{field}/...    (index partitions)
    pub root_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Number of hash-index partitions (buckets)
    pub hash_partitions: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./cardfile_data"),
            hash_partitions: DEFAULT_HASH_PARTITIONS,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Directory holding record files
    pub fn data_dir(&self) -> PathBuf {
        self.root_dir.join("data")
    }

    /// Directory holding index partitions
    pub fn index_dir(&self) -> PathBuf {
        self.root_dir.join("index")
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the root directory (base for data and index trees)
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.root_dir = path.into();
        self
    }

    /// Set the number of hash-index partitions
    pub fn hash_partitions(mut self, count: u32) -> Self {
        self.config.hash_partitions = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
