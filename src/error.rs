//! Error types for cardfile
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using CardfileError
pub type Result<T> = std::result::Result<T, CardfileError>;

/// Unified error type for cardfile operations
#[derive(Debug, Error)]
pub enum CardfileError {
    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("record not found: {id}")]
    NotFound { id: String },

    #[error("record already exists: {id}")]
    AlreadyExists { id: String },

    // -------------------------------------------------------------------------
    // Decode Errors
    // -------------------------------------------------------------------------
    #[error("corrupt record at {path}: {source}")]
    CorruptRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("corrupt index partition at {path}: {source}")]
    CorruptIndex {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("storage failure: {0}")]
    StorageFailure(#[from] std::io::Error),
}

impl CardfileError {
    /// Build a `NotFound` error for the given record id
    pub fn not_found(id: impl Into<String>) -> Self {
        CardfileError::NotFound { id: id.into() }
    }

    /// Build an `AlreadyExists` error for the given record id
    pub fn already_exists(id: impl Into<String>) -> Self {
        CardfileError::AlreadyExists { id: id.into() }
    }
}
