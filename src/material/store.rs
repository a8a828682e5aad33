//! Merging converted entries into the printer documents

use super::{FilamentProfileEntry, MaterialDatabase, MaterialOptions};
use crate::profile::FilamentNotes;

const DEFAULT_VENDOR: &str = "Generic";
const DEFAULT_TYPE: &str = "PLA";
const DEFAULT_NAME: &str = "Custom Filament";

/// Replace the entry with the same id in place, or append it.
///
/// The database version is overwritten in both cases.
pub fn merge_entry(database: &mut MaterialDatabase, entry: FilamentProfileEntry, version: &str) {
    let list = &mut database.result.list;
    match list
        .iter_mut()
        .find(|existing| existing.base.id == entry.base.id)
    {
        Some(existing) => *existing = entry,
        None => {
            list.push(entry);
            database.result.count = list.len();
        }
    }
    database.result.version = version.to_owned();
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

/// Register the display name under its vendor and type, once.
pub fn merge_option(options: &mut MaterialOptions, notes: &FilamentNotes) {
    let vendor = or_default(&notes.vendor, DEFAULT_VENDOR);
    let material_type = or_default(&notes.material_type, DEFAULT_TYPE);
    let name = or_default(&notes.name, DEFAULT_NAME);

    let names = options
        .entry(vendor.to_owned())
        .or_default()
        .entry(material_type.to_owned())
        .or_default();
    if names.is_empty() {
        names.push_str(name);
    } else if !names.split('\n').any(|existing| existing == name) {
        names.push('\n');
        names.push_str(name);
    }
}
