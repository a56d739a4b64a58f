//! # cardfile
//!
//! A file-backed record store for contact/note management with:
//! - One independently addressable JSON file per record
//! - Atomic write-then-rename mutation (all-or-nothing on crash)
//! - Trie-partitioned prefix search over name-like fields
//! - Hash-partitioned exact-match lookup over phone/email/tag-like fields
//! - Index rebuild as the recovery path for crash-induced staleness
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Collection Facades                            │
//! │           (AddressBook / NotesBook)                          │
//! └─────────┬──────────────────────────────┬────────────────────┘
//!           │ 1. mutate data               │ 2. mirror into indexes
//!           ▼                              ▼
//!   ┌───────────────┐              ┌───────────────┐
//!   │  EntityStore  │              │ IndexManager  │
//!   │ (one file per │              │ (per-field    │
//!   │    record)    │◄──rebuild────│  partitions)  │
//!   └───────┬───────┘              └───────┬───────┘
//!           │                              │
//!           ▼                              ▼
//!   ┌─────────────────────────────────────────────┐
//!   │              Atomic File Writer             │
//!   │        (temp file + fsync + rename)         │
//!   └─────────────────────────────────────────────┘
//! ```
//!
//! Data writes complete before index updates, so a crash between the two
//! leaves indexes stale — never the primary data inconsistent — and
//! `rebuild_indexes` repairs staleness from the authoritative record files.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod atomic;
pub mod codec;
pub mod record;
pub mod store;
pub mod index;
pub mod books;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CardfileError, Result};
pub use config::Config;
pub use record::{Entity, IdGenerator, Record, RecordId, UuidGenerator};
pub use store::EntityStore;
pub use index::{FieldSpec, HashIndex, Indexable, IndexKind, IndexManager, PrefixIndex};
pub use books::{AddressBook, Contact, Note, NotesBook};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of cardfile
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
