//! Collection Facades
//!
//! The externally consumed API: per-domain books composing an entity store
//! and an index manager into high-level operations.
//!
//! ## Responsibilities
//! - Run every mutation as store-write-then-index-update, in that order
//! - Serialize mutations per entity type (queries stay lock-free)
//! - Hydrate query hits into full records
//! - Repair a corrupt index with one automatic rebuild-and-retry
//!
//! Domain payload validation happens before these facades are invoked; the
//! books store what they are given.

mod collection;
mod contact;
mod note;

pub use contact::{AddressBook, Contact};
pub use note::{Note, NotesBook};
