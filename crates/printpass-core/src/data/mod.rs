//! Data models for printer telemetry
//!
//! This module provides:
//! - Printer status representation
//! - The per-printer telemetry snapshot evaluated by the tip engine
//! - Job detail fields reported alongside an active print
//!
//! Field names on the wire follow the dashboard feed: camelCase for the
//! printer fields, snake_case inside `job_details`. Every field is optional
//! and unknown keys are ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Printer operating status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrinterStatus {
    /// Printer is unreachable
    Offline,
    /// Printer reports a fault
    Error,
    /// A job is running
    Printing,
    /// Powered and waiting for work
    Idle,
    /// Warming up before a job
    Heating,
    /// Cooling down after a job
    Cooling,
    /// Any status string not listed above
    #[serde(other)]
    Unknown,
}

impl fmt::Display for PrinterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => write!(f, "Offline"),
            Self::Error => write!(f, "Error"),
            Self::Printing => write!(f, "Printing"),
            Self::Idle => write!(f, "Idle"),
            Self::Heating => write!(f, "Heating"),
            Self::Cooling => write!(f, "Cooling"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Slicer-derived details of the job currently on the printer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDetails {
    /// Infill density in percent
    pub infill_percent: Option<f64>,
    /// Layer height in millimetres
    pub layer_height_mm: Option<f64>,
    /// Total number of layers in the job
    pub total_layers: Option<f64>,
    /// Layer currently being printed
    pub current_layer: Option<f64>,
    /// Part extent along X in millimetres
    pub dimensions_x: Option<f64>,
    /// Part extent along Y in millimetres
    pub dimensions_y: Option<f64>,
    /// Part extent along Z in millimetres
    pub dimensions_z: Option<f64>,
}

impl JobDetails {
    /// Footprint area (X * Y), treating missing extents as zero
    pub fn footprint(&self) -> f64 {
        self.dimensions_x.unwrap_or(0.0) * self.dimensions_y.unwrap_or(0.0)
    }

    /// Bounding volume (X * Y * Z), treating missing extents as zero
    pub fn volume(&self) -> f64 {
        self.footprint() * self.dimensions_z.unwrap_or(0.0)
    }
}

/// Snapshot of a single printer's telemetry at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrinterSnapshot {
    pub friendly_name: Option<String>,
    pub current_status: Option<PrinterStatus>,
    pub current_material: Option<String>,
    pub job_filename: Option<String>,
    pub job_progress_percent: Option<f64>,
    pub job_kwh_consumed: Option<f64>,
    pub job_time_left_seconds: Option<f64>,
    #[serde(rename = "kwhLast24h")]
    pub kwh_last_24h: Option<f64>,
    pub last_job_kwh: Option<f64>,
    pub last_job_duration_minutes: Option<f64>,
    pub last_job_filament_grams: Option<f64>,
    pub nozzle_temp_actual: Option<f64>,
    pub nozzle_temp_target: Option<f64>,
    pub bed_temp_actual: Option<f64>,
    pub bed_temp_target: Option<f64>,
    pub printer_size_category: Option<String>,
    #[serde(rename = "job_details")]
    pub job_details: Option<JobDetails>,
}

impl PrinterSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the printer reports the given status
    pub fn is(&self, status: PrinterStatus) -> bool {
        self.current_status == Some(status)
    }

    /// Job details, or an empty set when none were reported
    pub fn job(&self) -> JobDetails {
        self.job_details.unwrap_or_default()
    }

    /// Whether the loaded material is one of `materials`
    pub fn material_in(&self, materials: &[&str]) -> bool {
        self.current_material
            .as_deref()
            .is_some_and(|m| materials.contains(&m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_dashboard_json() {
        let json = r#"{
            "friendlyName": "Prusa MK4 #2",
            "currentStatus": "Printing",
            "currentMaterial": "PETG",
            "jobProgressPercent": 42.5,
            "kwhLast24h": 1.2,
            "unrelatedField": [1, 2, 3],
            "job_details": {"infill_percent": 20, "dimensions_z": 35.5}
        }"#;
        let snapshot: PrinterSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.friendly_name.as_deref(), Some("Prusa MK4 #2"));
        assert!(snapshot.is(PrinterStatus::Printing));
        assert_eq!(snapshot.kwh_last_24h, Some(1.2));
        assert_eq!(snapshot.job().infill_percent, Some(20.0));
        assert_eq!(snapshot.job().dimensions_z, Some(35.5));
        assert!(snapshot.material_in(&["PLA", "PETG"]));
    }

    #[test]
    fn test_unknown_status_string() {
        let snapshot: PrinterSnapshot =
            serde_json::from_str(r#"{"currentStatus": "Paused"}"#).unwrap();
        assert_eq!(snapshot.current_status, Some(PrinterStatus::Unknown));
    }

    #[test]
    fn test_job_defaults_when_missing() {
        let snapshot = PrinterSnapshot::new();
        assert_eq!(snapshot.job(), JobDetails::default());
        assert_eq!(snapshot.job().volume(), 0.0);
        assert!(!snapshot.material_in(&["PLA"]));
    }

    #[test]
    fn test_job_volume() {
        let job = JobDetails {
            dimensions_x: Some(10.0),
            dimensions_y: Some(20.0),
            dimensions_z: Some(3.0),
            ..Default::default()
        };
        assert_eq!(job.footprint(), 200.0);
        assert_eq!(job.volume(), 600.0);
    }
}
