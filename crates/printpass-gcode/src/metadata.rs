//! Slicer metadata parsing
//!
//! PrusaSlicer-style G-code ends with a block of `; key = value` comments
//! describing the print. The parser collects those pairs and derives the
//! handful of values the passport needs. Missing or unparsable values come
//! back as `None`; parsing never fails.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Comment key holding the estimated print time
pub const KEY_PRINT_TIME: &str = "estimated printing time (normal mode)";
/// Comment key holding the filament weight in grams
pub const KEY_FILAMENT_GRAMS: &str = "filament used [g]";
/// Comment key holding the nozzle diameter
pub const KEY_NOZZLE_DIAMETER: &str = "nozzle_diameter";
/// Comment key holding the filament diameter
pub const KEY_FILAMENT_DIAMETER: &str = "filament_diameter";

/// Values derived from the slicer comment block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlicerMetadata {
    /// Estimated print duration in seconds
    pub duration_seconds: Option<u64>,
    /// Filament used in grams
    pub filament_used_g: Option<f64>,
    /// Nozzle diameter in millimetres
    pub nozzle_diameter: Option<f64>,
    /// Filament diameter in millimetres
    pub filament_diameter: Option<f64>,
}

fn pair_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*;\s*([^=]+?)\s*=\s*(.*)").expect("invalid comment regex"))
}

fn duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*(d|h|m|s)").expect("invalid duration regex"))
}

/// Collect every `; key = value` comment; a repeated key keeps its last value
pub fn parse_comment_pairs(content: &str) -> HashMap<String, String> {
    let regex = pair_regex();
    content
        .split('\n')
        .filter_map(|line| regex.captures(line))
        .map(|caps| (caps[1].trim().to_string(), caps[2].trim().to_string()))
        .collect()
}

/// Convert a slicer duration such as `1d 2h 3m 4s` into seconds
///
/// Returns `None` when the text is empty, contains no unit groups, or sums
/// to zero.
pub fn parse_duration_to_seconds(text: &str) -> Option<u64> {
    let mut seconds: u64 = 0;
    for caps in duration_regex().captures_iter(text) {
        let value: u64 = caps[1].parse().ok()?;
        let unit = match &caps[2] {
            "d" => 86_400,
            "h" => 3_600,
            "m" => 60,
            _ => 1,
        };
        seconds = seconds.checked_add(value.checked_mul(unit)?)?;
    }
    (seconds > 0).then_some(seconds)
}

fn parse_float(raw: &HashMap<String, String>, key: &str) -> Option<f64> {
    raw.get(key)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}

/// Parse the slicer comment block of a G-code file
pub fn parse_slicer_metadata(content: &str) -> SlicerMetadata {
    let raw = parse_comment_pairs(content);

    SlicerMetadata {
        duration_seconds: raw
            .get(KEY_PRINT_TIME)
            .and_then(|v| parse_duration_to_seconds(v)),
        filament_used_g: parse_float(&raw, KEY_FILAMENT_GRAMS),
        nozzle_diameter: parse_float(&raw, KEY_NOZZLE_DIAMETER),
        filament_diameter: parse_float(&raw, KEY_FILAMENT_DIAMETER),
    }
}
