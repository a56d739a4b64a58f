//! Record codec
//!
//! Serializes records and index partitions to their on-disk representation.
//!
//! ## File Format
//!
//! Pretty-printed JSON. The format is self-describing (field names travel
//! with the values, key order is irrelevant) and forward-tolerant: decoding
//! ignores fields the current payload type does not know about, and payload
//! types capture them in a flattened `extra` map so they round-trip.

use std::io;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Encode a value to its on-disk byte representation
///
/// Encoding a well-formed record cannot realistically fail; the residual
/// error case (non-string map keys and the like) maps to `StorageFailure`.
pub fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Decode a value from its on-disk byte representation
///
/// Callers map the decode error to `CorruptRecord` or `CorruptIndex`
/// depending on what the file holds.
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    serde_json::from_slice(bytes)
}
