use serde::{Deserialize, Serialize};

use crate::error::{DeviceValidationError, ValidationResult};

/// A registered printer and the integrations attached to it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Device {
    pub device_id: String,
    pub device_model: String,
    pub friendly_name: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,

    // Integrations
    pub shelly_id: Option<String>,
    pub api_ip: Option<String>,
    pub simplyprint_id: Option<String>,
    pub sp_company_id: Option<String>,

    // Build volume
    pub printer_size_category: Option<String>,
    pub bed_width: Option<f64>,
    pub bed_depth: Option<f64>,
}

fn blank_to_none(field: &mut Option<String>) {
    if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
        *field = None;
    }
}

fn check_dimension(field: &str, value: Option<f64>) -> ValidationResult<()> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(DeviceValidationError::ValueOutOfRange {
            field: field.to_string(),
            value: v.to_string(),
        }),
        _ => Ok(()),
    }
}

impl Device {
    pub fn new(device_id: impl Into<String>, device_model: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            device_model: device_model.into(),
            ..Default::default()
        }
    }

    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Store empty strings as absent
    pub fn normalize(&mut self) {
        self.device_id = self.device_id.trim().to_string();
        for field in [
            &mut self.friendly_name,
            &mut self.location,
            &mut self.notes,
            &mut self.shelly_id,
            &mut self.api_ip,
            &mut self.simplyprint_id,
            &mut self.sp_company_id,
            &mut self.printer_size_category,
        ] {
            blank_to_none(field);
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.device_id.trim().is_empty() {
            return Err(DeviceValidationError::MissingField("device_id".to_string()));
        }
        if self.device_model.trim().is_empty() {
            return Err(DeviceValidationError::MissingField(
                "device_model".to_string(),
            ));
        }
        check_dimension("bed_width", self.bed_width)?;
        check_dimension("bed_depth", self.bed_depth)?;
        Ok(())
    }
}

/// A partial change to a [`Device`]; unset fields are left alone.
///
/// The id itself cannot be changed. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelly_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simplyprint_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sp_company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printer_size_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_depth: Option<f64>,
}

impl DeviceUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the set fields to `device`
    pub fn apply_to(&self, device: &mut Device) {
        if let Some(model) = &self.device_model {
            device.device_model = model.clone();
        }

        let text_fields = [
            (&self.friendly_name, &mut device.friendly_name),
            (&self.location, &mut device.location),
            (&self.notes, &mut device.notes),
            (&self.shelly_id, &mut device.shelly_id),
            (&self.api_ip, &mut device.api_ip),
            (&self.simplyprint_id, &mut device.simplyprint_id),
            (&self.sp_company_id, &mut device.sp_company_id),
            (&self.printer_size_category, &mut device.printer_size_category),
        ];
        for (patch, target) in text_fields {
            if patch.is_some() {
                target.clone_from(patch);
            }
        }

        if self.bed_width.is_some() {
            device.bed_width = self.bed_width;
        }
        if self.bed_depth.is_some() {
            device.bed_depth = self.bed_depth;
        }
    }
}
