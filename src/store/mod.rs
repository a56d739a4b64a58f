//! Entity Store
//!
//! Owns the mapping from record id to on-disk file: one JSON record per
//! file, written through the atomic writer.
//!
//! ## Responsibilities
//! - Generate a fresh id per created record
//! - Persist records at `{data_dir}/{KIND}/{id}.rec`
//! - Read/update/delete individual records by id
//! - Enumerate every record currently on disk
//!
//! ## On-Disk Layout
//! ```text
//! data/
//! ├── contacts/
//! │   ├── 1a6f334a-601a-4e2a-b0f3-9b8f2c6a0b1d.rec
//! │   └── ...
//! └── notes/
//!     ├── 3c1a...d3f.rec
//!     └── ...
//! ```

mod entity_store;

pub use entity_store::EntityStore;

/// Record file extension
pub(crate) const RECORD_EXT: &str = "rec";
