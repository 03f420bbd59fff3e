//! # PrintPass Core
//!
//! Core types and error handling shared by the PrintPass crates.
//! Provides the printer telemetry snapshot consumed by the tip engine
//! and the error type used by the G-code analysis pipeline.

pub mod data;
pub mod error;

pub use data::{JobDetails, PrinterSnapshot, PrinterStatus};
pub use error::GcodeError;
