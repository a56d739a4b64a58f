//! Notes book
//!
//! Note payload type and its collection facade.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;
use crate::index::{FieldSpec, Indexable};
use crate::record::{Entity, Record, RecordId};

use super::collection::Collection;

// =============================================================================
// Note Payload
// =============================================================================

const FIELD_TITLE: &str = "title";
const FIELD_TAG: &str = "tag";

/// Index plan: titles get prefix search, tags exact lookup
const NOTE_INDEXES: &[FieldSpec] = &[FieldSpec::prefix(FIELD_TITLE), FieldSpec::hash(FIELD_TAG)];

/// A single note
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Ids of contacts this note relates to
    #[serde(default)]
    pub contact_ids: Vec<String>,

    /// Unknown fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Entity for Note {
    const KIND: &'static str = "notes";
}

impl Indexable for Note {
    fn index_plan() -> &'static [FieldSpec] {
        NOTE_INDEXES
    }

    fn values_for(&self, field: &str) -> Vec<String> {
        match field {
            FIELD_TITLE => vec![self.title.clone()],
            FIELD_TAG => self.tags.clone(),
            _ => Vec::new(),
        }
    }
}

// =============================================================================
// NotesBook Facade
// =============================================================================

/// High-level API for managing notes
pub struct NotesBook {
    notes: Collection<Note>,
}

impl NotesBook {
    /// Open or create a notes book under the configured root
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Self {
            notes: Collection::open(config)?,
        })
    }

    // -------------------------------------------------------------------------
    // CRUD
    // -------------------------------------------------------------------------

    /// Add a new note; returns the stored record with its generated id
    pub fn add_note(&self, note: Note) -> Result<Record<Note>> {
        self.notes.add(note)
    }

    /// Get a note by id
    pub fn note(&self, id: &RecordId) -> Result<Record<Note>> {
        self.notes.get(id)
    }

    /// Replace a note's payload; indexes follow the changed fields
    pub fn update_note(&self, id: &RecordId, note: Note) -> Result<Record<Note>> {
        self.notes.update(id, note)
    }

    /// Delete a note and every index posting referencing it
    pub fn delete_note(&self, id: &RecordId) -> Result<Record<Note>> {
        self.notes.remove(id)
    }

    /// All notes, in unspecified order
    pub fn list_notes(&self) -> Result<Vec<Record<Note>>> {
        self.notes.list()
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Notes whose title starts with `prefix` (case-insensitive)
    pub fn search_by_title(&self, prefix: &str) -> Result<Vec<Record<Note>>> {
        self.notes.search_prefix(FIELD_TITLE, prefix)
    }

    /// Notes carrying exactly this tag
    pub fn search_by_tag(&self, tag: &str) -> Result<Vec<Record<Note>>> {
        self.notes.search_exact(FIELD_TAG, tag)
    }

    /// Notes whose content contains `query` (case-insensitive)
    ///
    /// Unindexed: scans every note. Fine for the dataset sizes this store
    /// targets; indexed full-text search is out of scope.
    pub fn search_by_content(&self, query: &str) -> Result<Vec<Record<Note>>> {
        let needle = query.to_lowercase();
        let notes = self.notes.list()?;

        Ok(notes
            .into_iter()
            .filter(|n| n.payload.content.to_lowercase().contains(&needle))
            .collect())
    }

    /// Notes linked to the given contact
    ///
    /// Unindexed scan over the `contact_ids` back-references.
    pub fn notes_for_contact(&self, contact_id: &RecordId) -> Result<Vec<Record<Note>>> {
        let notes = self.notes.list()?;

        Ok(notes
            .into_iter()
            .filter(|n| n.payload.contact_ids.iter().any(|c| c == contact_id.as_str()))
            .collect())
    }

    // -------------------------------------------------------------------------
    // Maintenance
    // -------------------------------------------------------------------------

    /// Rebuild all note indexes from the stored records
    pub fn rebuild_indexes(&self) -> Result<usize> {
        self.notes.rebuild_indexes()
    }
}
