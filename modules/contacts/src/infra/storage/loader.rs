//! Dataset loader for the static contact file.
//!
//! The file is a JSON array of objects. `id` is either a plain string or a
//! document-database extended-JSON object (`{"$oid": "..."}`); both are
//! normalized to a [`ContactId`]. `full_name` must be present and
//! `is_favourite` defaults to `false`; both are kept as stored, whatever their
//! type. All remaining fields are kept verbatim, in source order, as record
//! attributes.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::domain::model::{Contact, ContactId};

const ID_FIELD: &str = "id";
const OID_FIELD: &str = "$oid";
const FULL_NAME_FIELD: &str = "full_name";
const FAVOURITE_FIELD: &str = "is_favourite";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read dataset '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataset must be a JSON array of records")]
    NotAnArray,

    #[error("record #{index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("duplicate contact id '{id}'")]
    DuplicateId { id: ContactId },
}

impl LoadError {
    fn invalid(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            index,
            reason: reason.into(),
        }
    }
}

/// Read and parse the dataset file at `path`.
///
/// # Errors
/// Returns `LoadError::Io` if the file cannot be read, otherwise any error
/// from [`parse_dataset`].
pub fn load_dataset(path: &Path) -> Result<Vec<Contact>, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let contacts = parse_dataset(&bytes)?;
    tracing::debug!(path = %path.display(), count = contacts.len(), "Parsed contacts dataset");
    Ok(contacts)
}

/// Parse a dataset held in memory.
///
/// Identifier uniqueness is not checked here; the repository enforces it
/// when building its index.
///
/// # Errors
/// Returns `LoadError` if the payload is not a JSON array or any record is
/// missing a usable `id` or a `full_name`.
pub fn parse_dataset(bytes: &[u8]) -> Result<Vec<Contact>, LoadError> {
    let Value::Array(records) = serde_json::from_slice(bytes)? else {
        return Err(LoadError::NotAnArray);
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| parse_record(index, record))
        .collect()
}

fn parse_record(index: usize, record: Value) -> Result<Contact, LoadError> {
    let Value::Object(mut fields) = record else {
        return Err(LoadError::invalid(index, "record must be a JSON object"));
    };

    // shift_remove keeps the remaining attributes in source order
    let id = fields
        .shift_remove(ID_FIELD)
        .ok_or_else(|| LoadError::invalid(index, "missing 'id'"))
        .and_then(|raw| parse_id(index, raw))?;

    let full_name = fields
        .shift_remove(FULL_NAME_FIELD)
        .ok_or_else(|| LoadError::invalid(index, "missing 'full_name'"))?;

    let favourite = fields
        .shift_remove(FAVOURITE_FIELD)
        .unwrap_or(Value::Bool(false));

    Ok(Contact {
        id,
        full_name,
        favourite,
        attributes: fields,
    })
}

fn parse_id(index: usize, raw: Value) -> Result<ContactId, LoadError> {
    match raw {
        Value::String(id) if !id.is_empty() => Ok(ContactId::from(id)),
        Value::Object(mut obj) => match obj.shift_remove(OID_FIELD) {
            Some(Value::String(oid)) if !oid.is_empty() => Ok(ContactId::from(oid)),
            _ => Err(LoadError::invalid(
                index,
                "object 'id' must carry a non-empty string '$oid'",
            )),
        },
        _ => Err(LoadError::invalid(
            index,
            "'id' must be a non-empty string or {\"$oid\": ...}",
        )),
    }
}
