//! Slicer profile reading
//!
//! A profile is kept twice: the few top-level fields the pipeline needs by
//! name, and the complete field set for flattening.

use serde::Deserialize;

pub mod normalize;
pub mod notes;

pub use normalize::{NormalizedProfile, normalize};
pub use notes::{FilamentNotes, MetadataError};

/// Every top-level field of a profile, in document order.
pub type RawProfile = serde_json::Map<String, serde_json::Value>;

/// One slicer filament profile as read from disk.
#[derive(Debug, Clone)]
pub struct SlicerProfile {
    pub name: String,
    pub version: String,
    pub filament_notes: Vec<String>,
    pub raw: RawProfile,
}

#[derive(Deserialize)]
struct Header {
    name: Option<String>,
    version: Option<String>,
    filament_notes: Option<Vec<String>>,
}

impl SlicerProfile {
    /// Read a profile from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let header = serde_json::from_slice::<Header>(bytes)?;
        let raw = serde_json::from_slice::<RawProfile>(bytes)?;
        Ok(Self {
            name: header.name.unwrap_or_default(),
            version: header.version.unwrap_or_default(),
            filament_notes: header.filament_notes.unwrap_or_default(),
            raw,
        })
    }
}
