//! Identity block embedded in `filament_notes`
//!
//! Slicer profiles carry their printer-side identity as a JSON document
//! encoded into the first element of the `filament_notes` array.

use serde::{Deserialize, Serialize};

pub const CARRIER_FIELD: &str = "filament_notes";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilamentNotes {
    pub id: String,
    pub vendor: String,
    #[serde(rename = "type")]
    pub material_type: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("`filament_notes` is missing")]
    Missing,
    #[error("`filament_notes` is empty")]
    Empty,
    #[error("`filament_notes` is not valid JSON: {source} (raw note: {raw})")]
    Malformed {
        source: serde_json::Error,
        raw: String,
    },
    #[error("`filament_notes` has no id")]
    MissingId,
}

/// Strip at most one quote character from each end.
fn unquote(note: &str) -> &str {
    let note = note.strip_prefix('"').unwrap_or(note);
    note.strip_suffix('"').unwrap_or(note)
}

impl FilamentNotes {
    /// Parse the identity block from the carrier array.
    pub fn from_carrier(carrier: &[String]) -> Result<Self, MetadataError> {
        let first = carrier.first().ok_or(MetadataError::Missing)?;
        if first.trim().is_empty() {
            return Err(MetadataError::Empty);
        }
        let raw = unquote(first.trim());
        let notes = serde_json::from_str::<FilamentNotes>(raw).map_err(|source| {
            MetadataError::Malformed {
                source,
                raw: raw.to_owned(),
            }
        })?;
        if notes.id.is_empty() {
            return Err(MetadataError::MissingId);
        }
        Ok(notes)
    }

    /// Serialize the block and quote the result as a JSON string literal.
    pub fn to_quoted_json(&self) -> Result<String, serde_json::Error> {
        let encoded = serde_json::to_string(self)?;
        serde_json::to_string(&encoded)
    }
}

/// Structural pre-check run against a whole document before it is read as a profile.
///
/// The carrier has to be a non-empty array whose first element is a string
/// mentioning an `"id":` key and decoding into notes with a non-empty id.
pub fn precheck(
    document: &serde_json::Map<String, serde_json::Value>,
) -> Result<FilamentNotes, MetadataError> {
    let carrier = document.get(CARRIER_FIELD).ok_or(MetadataError::Missing)?;
    let serde_json::Value::Array(items) = carrier else {
        return Err(MetadataError::Missing);
    };
    let Some(serde_json::Value::String(first)) = items.first() else {
        return Err(MetadataError::Empty);
    };
    if first.trim().is_empty() || !first.contains(r#""id":"#) {
        return Err(MetadataError::Empty);
    }
    FilamentNotes::from_carrier(std::slice::from_ref(first))
}
