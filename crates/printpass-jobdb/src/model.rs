use chrono::{DateTime, Utc};
use printpass_gcode::GcodeAnalysis;
use serde::{Deserialize, Serialize};

use crate::error::JobValidationError;

/// Lifecycle state of a print job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Printing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Printing => "printing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

/// One print job and the data its passport is built from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintJob {
    /// Assigned by the store; ignored when a job is added
    pub job_id: u64,
    pub device_id: String,
    pub filename: Option<String>,
    pub status: JobStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<u64>,
    pub kwh_consumed: Option<f64>,
    pub filament_used_g: Option<f64>,
    pub dpp_pdf_url: Option<String>,
    pub gcode_analysis_data: Option<GcodeAnalysis>,
}

fn check_amount(field: &str, value: Option<f64>) -> Result<(), JobValidationError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(JobValidationError::ValueOutOfRange {
            field: field.to_string(),
            value: v.to_string(),
        }),
        _ => Ok(()),
    }
}

impl PrintJob {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            ..Default::default()
        }
    }

    /// A completed job that ended at `end_time`
    pub fn completed(device_id: impl Into<String>, end_time: DateTime<Utc>) -> Self {
        Self {
            status: JobStatus::Completed,
            end_time: Some(end_time),
            ..Self::new(device_id)
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }

    pub fn validate(&self) -> Result<(), JobValidationError> {
        if self.device_id.trim().is_empty() {
            return Err(JobValidationError::MissingField("device_id".to_string()));
        }
        check_amount("kwh_consumed", self.kwh_consumed)?;
        check_amount("filament_used_g", self.filament_used_g)?;
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end < start {
                return Err(JobValidationError::EndBeforeStart);
            }
        }
        Ok(())
    }
}
