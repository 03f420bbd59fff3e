//! Error types for the device registry crate.

use std::io;
use thiserror::Error;

/// Errors that can occur during device registry operations.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// The requested device was not found.
    #[error("Device not found: {0}")]
    NotFound(String),

    /// A device with this ID already exists.
    #[error("Device already exists: {0}")]
    AlreadyExists(String),

    /// An update carried no fields.
    #[error("No update data provided")]
    EmptyUpdate,

    /// Failed to load the registry file.
    #[error("Failed to load devices from {path}: {reason}")]
    LoadError { path: String, reason: String },

    /// Failed to save the registry file.
    #[error("Failed to save devices: {0}")]
    SaveError(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A device validation error occurred.
    #[error("Validation error: {0}")]
    Validation(#[from] DeviceValidationError),
}

/// Errors related to device validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceValidationError {
    /// A required field is missing or empty.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A numeric value is out of valid range.
    #[error("Value out of range for '{field}': {value}")]
    ValueOutOfRange { field: String, value: String },
}

/// Result type alias for device registry operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Result type alias for device validation.
pub type ValidationResult<T> = Result<T, DeviceValidationError>;
