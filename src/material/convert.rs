//! Slicer profile → printer entry conversion

use super::{BaseInfo, FilamentProfileEntry, KvParam};
use crate::profile::{FilamentNotes, NormalizedProfile};

/// `(printer field, slicer field)` pairs, in the order the printer lists them.
///
/// `filament_notes` is overwritten with the re-encoded identity block and
/// `filament_type`/`filament_vendor` prefer the identity block when it has them.
pub const KV_PARAM_FIELDS: &[(&str, &str)] = &[
    ("activate_air_filtration", "activate_air_filtration"),
    ("activate_chamber_temp_control", "activate_chamber_temp_control"),
    ("additional_cooling_fan_speed", "additional_cooling_fan_speed"),
    ("chamber_temperature", "chamber_temperature"),
    ("close_fan_the_first_x_layers", "close_fan_the_first_x_layers"),
    ("compatible_printers", "compatible_printers"),
    ("compatible_printers_condition", "compatible_printers_condition"),
    ("compatible_prints", "compatible_prints"),
    ("compatible_prints_condition", "compatible_prints_condition"),
    ("complete_print_exhaust_fan_speed", "complete_print_exhaust_fan_speed"),
    ("cool_cds_fan_start_at_height", "cool_cds_fan_start_at_height"),
    ("cool_plate_temp", "cool_plate_temp"),
    ("cool_plate_temp_initial_layer", "cool_plate_temp_initial_layer"),
    ("cool_special_cds_fan_speed", "cool_special_cds_fan_speed"),
    ("default_filament_colour", "default_filament_colour"),
    ("during_print_exhaust_fan_speed", "during_print_exhaust_fan_speed"),
    ("enable_overhang_bridge_fan", "enable_overhang_bridge_fan"),
    ("enable_pressure_advance", "enable_pressure_advance"),
    ("enable_special_area_additional_cooling_fan", "enable_special_area_additional_cooling_fan"),
    ("eng_plate_temp", "eng_plate_temp"),
    ("eng_plate_temp_initial_layer", "eng_plate_temp_initial_layer"),
    ("epoxy_resin_plate_temp", "epoxy_resin_plate_temp"),
    ("epoxy_resin_plate_initial_layer", "epoxy_resin_plate_initial_layer"),
    ("fan_cooling_layer_time", "fan_cooling_layer_time"),
    ("fan_max_speed", "fan_max_speed"),
    ("fan_min_speed", "fan_min_speed"),
    ("filament_cooling_final_speed", "filament_cooling_final_speed"),
    ("filament_cooling_initial_initial", "filament_cooling_initial_initial"),
    ("filament_cooling_moves", "filament_cooling_moves"),
    ("filament_cost", "filament_cost"),
    ("filament_density", "filament_density"),
    ("filament_deretraction_speed", "filament_deretraction_speed"),
    ("filament_diameter", "filament_diameter"),
    ("filament_end_gcode", "filament_end_gcode"),
    ("filament_flow_ratio", "filament_flow_ratio"),
    ("filament_is_support", "filament_is_support"),
    ("filament_load_time", "filament_load_time"),
    ("filament_loading_speed", "filament_loading_speed"),
    ("filament_loading_speed_start", "filament_loading_speed_start"),
    ("filament_max_volumetric_speed", "filament_max_volumetric_speed"),
    ("filament_minimal_purge_on_wipe_tower", "filament_minimal_purge_on_wipe_tower"),
    ("filament_multitool_ramming", "filament_multitool_ramming"),
    ("filament_multitool_ramming_flow", "filament_multitool_ramming_flow"),
    ("filament_multitool_ramming_volume", "filament_multitool_ramming_volume"),
    ("filament_notes", "filament_notes"),
    ("filament_ramming_parameters", "filament_ramming_parameters"),
    ("filament_retract_before_wipe", "filament_retract_before_wipe"),
    ("filament_retract_lift_above", "filament_retract_lift_above"),
    ("filament_retract_lift_below", "filament_retract_lift_below"),
    ("filament_retract_lift_enforce", "filament_retract_lift_enforce"),
    ("filament_retract_restart_extra", "filament_retract_restart_extra"),
    ("filament_retract_when_changing_layer", "filament_retract_when_changing_layer"),
    ("filament_retraction_length", "filament_retraction_length"),
    ("filament_retraction_minimum_travel", "filament_retraction_minimum_travel"),
    ("filament_retraction_speed", "filament_retraction_speed"),
    ("filament_shrink", "filament_shrink"),
    ("filament_shrinkage_compensation_z", "filament_shrinkage_compensation_z"),
    ("filament_soluble", "filament_soluble"),
    ("filament_start_gcode", "filament_start_gcode"),
    ("filament_toolchange_delay", "filament_toolchange_delay"),
    ("filament_type", "filament_type"),
    ("filament_unload_time", "filament_unload_time"),
    ("filament_unloading_speed", "filament_unloading_speed"),
    ("filament_unloading_speed_start", "filament_unloading_speed_start"),
    ("filament_vendor", "filament_vendor"),
    ("filament_wipe", "filament_wipe"),
    ("filament_wipe_distance", "filament_wipe_distance"),
    ("filament_z_hop", "filament_z_hop"),
    ("filament_z_hop_types", "filament_z_hop_types"),
    ("full_fan_speed_layer", "full_fan_speed_layer"),
    ("hot_plate_temp", "hot_plate_temp"),
    ("hot_plate_temp_initial_layer", "hot_plate_temp_initial_layer"),
    ("inherits", "inherits"),
    ("material_flow_dependent_temperature", "material_flow_dependent_temperature"),
    ("material_flow_temp_graph", "material_flow_temp_graph"),
    ("nozzle_temperature", "nozzle_temperature"),
    ("nozzle_temperature_initial_layer", "nozzle_temperature_initial_layer"),
    ("nozzle_temperature_range_high", "nozzle_temperature_range_high"),
    ("nozzle_temperature_range_low", "nozzle_temperature_range_low"),
    ("overhang_fan_speed", "overhang_fan_speed"),
    ("overhang_fan_threshold", "overhang_fan_threshold"),
    ("pressure_advance", "pressure_advance"),
    ("reduce_fan_stop_start_freq", "reduce_fan_stop_start_freq"),
    ("required_nozzle_HRC", "required_nozzle_HRC"),
    ("slow_down_for_layer_cooling", "slow_down_for_layer_cooling"),
    ("warmup_start_layer", "warmup_start_layer"),
    ("slow_down_layer_time", "slow_down_layer_time"),
    ("slow_down_min_speed", "slow_down_min_speed"),
    ("support_material_interface_fan_speed", "support_material_interface_fan_speed"),
    ("temperature_vitrification", "temperature_vitrification"),
    ("textured_plate_temp", "textured_plate_temp"),
    ("textured_plate_temp_initial_layer", "textured_plate_temp_initial_layer"),
];

/// The printer model every converted entry is tagged for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDevice {
    pub printer_int_name: String,
    pub nozzle_diameter: String,
}

impl Default for TargetDevice {
    fn default() -> Self {
        Self {
            printer_int_name: "F008".to_owned(),
            nozzle_diameter: "0.4".to_owned(),
        }
    }
}

const DEFAULT_COLOR: &str = "#ffffff";

fn lookup<'a>(fields: &'a NormalizedProfile, name: &str) -> &'a str {
    fields.get(name).map(String::as_str).unwrap_or_default()
}

fn parse_int(value: &str) -> i64 {
    value.parse().unwrap_or_default()
}

fn parse_float(value: &str) -> f64 {
    value
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or_default()
}

fn parse_percent(value: &str) -> i64 {
    parse_int(value.strip_suffix('%').unwrap_or(value))
}

fn is_set(value: &str) -> bool {
    value == "1"
}

/// Derive the typed base record from the already mapped parameters.
fn base_info(notes: &FilamentNotes, kv: &KvParam, diameter: &str) -> BaseInfo {
    let field = |name: &str| kv.get(name).unwrap_or_default();
    BaseInfo {
        id: notes.id.clone(),
        brand: notes.vendor.clone(),
        name: notes.name.clone(),
        material_type: notes.material_type.clone(),
        colors: vec![DEFAULT_COLOR.to_owned()],
        diameter: diameter.to_owned(),
        density: parse_float(field("filament_density")),
        cost_per_meter: parse_int(field("filament_cost")),
        min_temp: parse_int(field("nozzle_temperature_range_low")),
        max_temp: parse_int(field("nozzle_temperature_range_high")),
        is_soluble: is_set(field("filament_soluble")),
        is_support: is_set(field("filament_is_support")),
        shrinkage_rate: parse_percent(field("filament_shrink")),
        softening_temp: parse_int(field("temperature_vitrification")),
        drying_temp: parse_int(field("hot_plate_temp")),
        drying_time: parse_int(field("slow_down_layer_time")),
        ..Default::default()
    }
}

/// Convert a normalized slicer profile into a printer database entry.
pub fn convert(
    fields: &NormalizedProfile,
    notes: &FilamentNotes,
    device: &TargetDevice,
) -> Result<FilamentProfileEntry, serde_json::Error> {
    let quoted_notes = notes.to_quoted_json()?;

    let mut kv = KvParam::default();
    for (target, source) in KV_PARAM_FIELDS {
        kv.insert(*target, lookup(fields, source));
    }
    kv.insert("filament_notes", quoted_notes);
    if !notes.material_type.is_empty() {
        kv.insert("filament_type", notes.material_type.as_str());
    }
    if !notes.vendor.is_empty() {
        kv.insert("filament_vendor", notes.vendor.as_str());
    }

    let base = base_info(notes, &kv, lookup(fields, "filament_diameter"));
    Ok(FilamentProfileEntry {
        engine_version: lookup(fields, "version").to_owned(),
        printer_int_name: device.printer_int_name.clone(),
        nozzle_diameter: vec![device.nozzle_diameter.clone()],
        kv_param: kv,
        base,
    })
}
