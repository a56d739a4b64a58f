//! Address book
//!
//! Contact payload type and its collection facade.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;
use crate::index::{FieldSpec, Indexable};
use crate::record::{Entity, Record, RecordId};

use super::collection::Collection;

// =============================================================================
// Contact Payload
// =============================================================================

/// Contact index directories (also the index plan's field names)
const FIELD_FIRST_NAME: &str = "first_name";
const FIELD_LAST_NAME: &str = "last_name";
const FIELD_PHONE: &str = "phone";
const FIELD_EMAIL: &str = "email";

/// Index plan: names get prefix search, phone/email exact lookup
const CONTACT_INDEXES: &[FieldSpec] = &[
    FieldSpec::prefix(FIELD_FIRST_NAME),
    FieldSpec::prefix(FIELD_LAST_NAME),
    FieldSpec::hash(FIELD_PHONE),
    FieldSpec::hash(FIELD_EMAIL),
];

/// A single contact
///
/// Multi-valued fields (phones, emails) produce one index posting per value.
/// Fields this version does not know about are captured in `extra` and
/// survive a read/write round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub phones: Vec<String>,

    #[serde(default)]
    pub emails: Vec<String>,

    /// Ids of notes linked to this contact
    #[serde(default)]
    pub note_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Unknown fields, preserved for forward compatibility
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Entity for Contact {
    const KIND: &'static str = "contacts";
}

impl Indexable for Contact {
    fn index_plan() -> &'static [FieldSpec] {
        CONTACT_INDEXES
    }

    fn values_for(&self, field: &str) -> Vec<String> {
        match field {
            FIELD_FIRST_NAME => vec![self.first_name.clone()],
            FIELD_LAST_NAME => vec![self.last_name.clone()],
            FIELD_PHONE => self.phones.clone(),
            FIELD_EMAIL => self.emails.clone(),
            _ => Vec::new(),
        }
    }
}

// =============================================================================
// AddressBook Facade
// =============================================================================

/// High-level API for managing contacts
///
/// Composes the contact store and its indexes; every mutation keeps both in
/// step, every search answers from an index and hydrates full records.
pub struct AddressBook {
    contacts: Collection<Contact>,
}

impl AddressBook {
    /// Open or create an address book under the configured root
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Self {
            contacts: Collection::open(config)?,
        })
    }

    // -------------------------------------------------------------------------
    // CRUD
    // -------------------------------------------------------------------------

    /// Add a new contact; returns the stored record with its generated id
    pub fn add_contact(&self, contact: Contact) -> Result<Record<Contact>> {
        self.contacts.add(contact)
    }

    /// Get a contact by id
    pub fn contact(&self, id: &RecordId) -> Result<Record<Contact>> {
        self.contacts.get(id)
    }

    /// Replace a contact's payload; indexes follow the changed fields
    pub fn update_contact(&self, id: &RecordId, contact: Contact) -> Result<Record<Contact>> {
        self.contacts.update(id, contact)
    }

    /// Delete a contact and every index posting referencing it
    pub fn remove_contact(&self, id: &RecordId) -> Result<Record<Contact>> {
        self.contacts.remove(id)
    }

    /// All contacts, in unspecified order
    pub fn list_contacts(&self) -> Result<Vec<Record<Contact>>> {
        self.contacts.list()
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Contacts whose first name starts with `prefix` (case-insensitive)
    pub fn search_by_first_name(&self, prefix: &str) -> Result<Vec<Record<Contact>>> {
        self.contacts.search_prefix(FIELD_FIRST_NAME, prefix)
    }

    /// Contacts whose last name starts with `prefix` (case-insensitive)
    pub fn search_by_last_name(&self, prefix: &str) -> Result<Vec<Record<Contact>>> {
        self.contacts.search_prefix(FIELD_LAST_NAME, prefix)
    }

    /// Contacts with exactly this phone number
    pub fn search_by_phone(&self, phone: &str) -> Result<Vec<Record<Contact>>> {
        self.contacts.search_exact(FIELD_PHONE, phone)
    }

    /// Contacts with exactly this email address
    pub fn search_by_email(&self, email: &str) -> Result<Vec<Record<Contact>>> {
        self.contacts.search_exact(FIELD_EMAIL, email)
    }

    // -------------------------------------------------------------------------
    // Maintenance
    // -------------------------------------------------------------------------

    /// Rebuild all contact indexes from the stored records
    pub fn rebuild_indexes(&self) -> Result<usize> {
        self.contacts.rebuild_indexes()
    }
}
