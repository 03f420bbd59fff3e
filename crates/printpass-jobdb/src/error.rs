//! Error types for the print job store.

use std::io;
use thiserror::Error;

/// Errors that can occur during job store operations.
#[derive(Error, Debug)]
pub enum JobError {
    /// The requested job was not found.
    #[error("Print job not found: {0}")]
    NotFound(u64),

    /// Failed to load the store file.
    #[error("Failed to load print jobs from {path}: {reason}")]
    LoadError { path: String, reason: String },

    /// Failed to save the store file.
    #[error("Failed to save print jobs: {0}")]
    SaveError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A job record failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] JobValidationError),
}

/// Errors related to job record validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Value out of range for '{field}': {value}")]
    ValueOutOfRange { field: String, value: String },

    /// The job ends before it starts.
    #[error("end_time is before start_time")]
    EndBeforeStart,
}

/// Result type alias for job store operations.
pub type JobResult<T> = Result<T, JobError>;
