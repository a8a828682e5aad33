//! Printer-side material database
//!
//! The printer reads two documents: `material_database.json` (every known
//! filament with its tuning parameters) and `material_option.json` (the
//! vendor → type → names index used by its filament picker).

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod convert;
pub mod store;

pub use convert::{KV_PARAM_FIELDS, TargetDevice, convert};
pub use store::{merge_entry, merge_option};

pub const DATABASE_FILE_NAME: &str = "material_database.json";
pub const OPTIONS_FILE_NAME: &str = "material_option.json";

static BASELINE_DATABASE: &[u8] = include_bytes!("../../data/material_database.json");
static BASELINE_OPTIONS: &[u8] = include_bytes!("../../data/material_option.json");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDatabase {
    pub code: i64,
    pub msg: String,
    #[serde(rename = "reqId")]
    pub req_id: String,
    pub result: MaterialList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialList {
    pub list: Vec<FilamentProfileEntry>,
    pub count: usize,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilamentProfileEntry {
    pub engine_version: String,
    pub printer_int_name: String,
    pub nozzle_diameter: Vec<String>,
    pub kv_param: KvParam,
    pub base: BaseInfo,
}

/// Flat tuning parameters, keyed by the printer's field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KvParam(pub IndexMap<String, String>);

impl KvParam {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Misspelled keys are what the firmware expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaseInfo {
    pub id: String,
    pub brand: String,
    pub name: String,
    #[serde(rename = "meterialType")]
    pub material_type: String,
    pub colors: Vec<String>,
    pub density: f64,
    pub diameter: String,
    pub cost_per_meter: i64,
    pub weight_per_meter: i64,
    pub rank: i64,
    pub min_temp: i64,
    pub max_temp: i64,
    pub is_soluble: bool,
    #[serde(rename = "isSuppoert")]
    pub is_support: bool,
    pub shrinkage_rate: i64,
    pub softening_temp: i64,
    pub drying_temp: i64,
    pub drying_time: i64,
}

/// Vendor → material type → newline separated display names.
pub type MaterialOptions = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse material database: {0}")]
    Database(serde_json::Error),
    #[error("Failed to parse material options: {0}")]
    Options(serde_json::Error),
}

impl MaterialDatabase {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        serde_json::from_slice(bytes).map_err(LoadError::Database)
    }

    /// The database compiled into the binary.
    pub fn baseline() -> Result<Self, LoadError> {
        Self::from_slice(BASELINE_DATABASE)
    }

    pub fn find(&self, id: &str) -> Option<&FilamentProfileEntry> {
        self.result.list.iter().find(|entry| entry.base.id == id)
    }
}

pub fn options_from_slice(bytes: &[u8]) -> Result<MaterialOptions, LoadError> {
    serde_json::from_slice(bytes).map_err(LoadError::Options)
}

/// The option index compiled into the binary.
pub fn baseline_options() -> Result<MaterialOptions, LoadError> {
    options_from_slice(BASELINE_OPTIONS)
}

/// Pretty-print with tab indentation, the layout the printer ships with.
pub fn to_tab_indented_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}
