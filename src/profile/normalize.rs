//! Flattening of slicer fields into single strings
//!
//! Slicers wrap almost every scalar in a one-element array (one slot per
//! extruder). Only the first slot is kept.

use indexmap::IndexMap;
use serde_json::{Number, Value};

use super::{FilamentNotes, MetadataError, SlicerProfile, notes::CARRIER_FIELD};

/// Field name to flattened value, in document order.
pub type NormalizedProfile = IndexMap<String, String>;

const RESERVED_FIELDS: [&str; 3] = ["name", "version", CARRIER_FIELD];

/// Render a number the way slicers write it: integral values without a fraction.
///
/// Everything else uses serde_json's shortest form, exponent included.
fn number_to_string(number: &Number) -> String {
    if let Some(int) = number.as_i64() {
        return int.to_string();
    }
    if let Some(uint) = number.as_u64() {
        return uint.to_string();
    }
    match number.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() < 1e21 => format!("{float:.0}"),
        _ => number.to_string(),
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number_to_string(number),
        Value::String(string) => string.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Flatten one raw value. Empty arrays produce nothing.
pub fn flatten_value(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items.first().map(scalar_to_string),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Object(_) => {
            Some(scalar_to_string(value))
        }
    }
}

/// Flatten a profile and extract its identity block.
pub fn normalize(
    profile: &SlicerProfile,
) -> Result<(NormalizedProfile, FilamentNotes), MetadataError> {
    let mut fields = profile
        .raw
        .iter()
        .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
        .filter_map(|(key, value)| Some((key.clone(), flatten_value(value)?)))
        .collect::<NormalizedProfile>();
    fields.insert("name".to_owned(), profile.name.clone());
    fields.insert("version".to_owned(), profile.version.clone());

    let notes = FilamentNotes::from_carrier(&profile.filament_notes)?;
    Ok((fields, notes))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{flatten_value, normalize};
    use crate::profile::{MetadataError, SlicerProfile};

    fn profile(document: serde_json::Value) -> SlicerProfile {
        SlicerProfile::from_slice(document.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn keeps_only_first_array_element() {
        assert_eq!(flatten_value(&json!(["a"])).as_deref(), Some("a"));
        assert_eq!(flatten_value(&json!(["a", "b", "c"])).as_deref(), Some("a"));
        assert_eq!(flatten_value(&json!([3, 4])).as_deref(), Some("3"));
        assert_eq!(flatten_value(&json!([])), None);
    }

    #[test]
    fn stringifies_scalars() {
        assert_eq!(flatten_value(&json!(1.24)).as_deref(), Some("1.24"));
        assert_eq!(flatten_value(&json!(220.0)).as_deref(), Some("220"));
        assert_eq!(flatten_value(&json!(-5)).as_deref(), Some("-5"));
        assert_eq!(flatten_value(&json!([true])).as_deref(), Some("true"));
        assert_eq!(flatten_value(&json!(false)).as_deref(), Some("false"));
        assert_eq!(flatten_value(&json!(null)).as_deref(), Some(""));
    }

    #[test]
    fn extreme_magnitudes_keep_exponent_form() {
        assert_eq!(flatten_value(&json!(1e300)).as_deref(), Some("1e300"));
        assert_eq!(flatten_value(&json!(1.5e21)).as_deref(), Some("1.5e21"));
        assert_eq!(flatten_value(&json!([1e-7])).as_deref(), Some("1e-7"));
        assert_eq!(flatten_value(&json!(1e20)).as_deref(), Some("100000000000000000000"));
    }

    #[test]
    fn nested_values_fall_back_to_json_text() {
        assert_eq!(
            flatten_value(&json!([{"x": 1}])).as_deref(),
            Some(r#"{"x":1}"#)
        );
        assert_eq!(flatten_value(&json!([[1, 2]])).as_deref(), Some("[1,2]"));
    }

    #[test]
    fn drops_empty_arrays_and_injects_name_and_version() {
        let (fields, notes) = normalize(&profile(json!({
            "name": "Red PLA",
            "version": "1.9.0.2",
            "filament_notes": [r#"{"id":"F1","vendor":"Acme","type":"PLA","name":"RedPLA"}"#],
            "filament_density": ["1.24"],
            "compatible_printers": [],
            "inherits": "",
        })))
        .unwrap();
        assert_eq!(notes.id, "F1");
        assert_eq!(fields.get("filament_density").unwrap(), "1.24");
        assert!(!fields.contains_key("compatible_printers"));
        assert!(!fields.contains_key("filament_notes"));
        assert_eq!(fields.get("inherits").unwrap(), "");
        assert_eq!(fields.get("name").unwrap(), "Red PLA");
        assert_eq!(fields.get("version").unwrap(), "1.9.0.2");
    }

    #[test]
    fn empty_carrier_is_missing_metadata() {
        let result = normalize(&profile(json!({
            "name": "Red PLA",
            "filament_notes": [],
        })));
        assert!(matches!(result, Err(MetadataError::Missing)));
    }
}
