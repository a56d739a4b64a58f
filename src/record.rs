//! Record model
//!
//! A record is a uniquely identified entity persisted as one file. The
//! envelope (`Record<P>`) carries the generated id and the creation/update
//! timestamps; the domain payload is flattened into the same JSON object so
//! record files stay flat and self-describing.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A payload type that can be persisted by an [`EntityStore`](crate::EntityStore)
///
/// `KIND` names the on-disk directory for the entity type ("contacts",
/// "notes", ...). Record files live at `data/{KIND}/{id}.rec` and index
/// partitions under `index/{KIND}/`.
pub trait Entity: Serialize + DeserializeOwned + Clone {
    /// Entity type directory name, unique per payload type
    const KIND: &'static str;
}

// =============================================================================
// Record Identifier
// =============================================================================

/// Opaque unique record identifier
///
/// Generated once at creation and immutable afterwards. Doubles as the record
/// file stem and as the value stored in index postings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId(id.to_string())
    }
}

// =============================================================================
// Identifier Generation
// =============================================================================

/// Supplies a fresh globally-unique id for each created record
///
/// The store consumes this as a collaborator interface; tests may inject a
/// deterministic implementation.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> RecordId;
}

/// Default generator: random UUID v4
#[derive(Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> RecordId {
        RecordId(uuid::Uuid::new_v4().to_string())
    }
}

// =============================================================================
// Record Envelope
// =============================================================================

/// A stored record: id + timestamps + domain payload
///
/// `created_at` is assigned once on create; `update` preserves it and
/// refreshes `updated_at`. The payload is flattened, so on disk a contact
/// record reads as one flat JSON object:
///
/// ```json
/// {
///   "id": "1a6f334a-...",
///   "created_at": "2026-08-08T10:15:00Z",
///   "updated_at": "2026-08-08T10:15:00Z",
///   "first_name": "John",
///   "phones": ["+380501234567"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<P> {
    /// Unique identifier, immutable for the record's lifetime
    pub id: RecordId,

    /// Creation timestamp (UTC), preserved across updates
    pub created_at: DateTime<Utc>,

    /// Last-mutation timestamp (UTC)
    pub updated_at: DateTime<Utc>,

    /// Domain payload, flattened into the record object
    #[serde(flatten)]
    pub payload: P,
}

impl<P> Record<P> {
    /// Build a fresh record stamped with the current time
    pub fn new(id: RecordId, payload: P) -> Self {
        let now = Utc::now();
        Record {
            id,
            created_at: now,
            updated_at: now,
            payload,
        }
    }

    /// Build the successor of an existing record: same id and creation time,
    /// new payload, refreshed update time
    pub fn succeed(&self, payload: P) -> Self {
        Record {
            id: self.id.clone(),
            created_at: self.created_at,
            updated_at: Utc::now(),
            payload,
        }
    }
}
