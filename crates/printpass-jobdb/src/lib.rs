//! Print job records with a retention policy.
//!
//! Each job keeps its G-code analysis document next to the energy and
//! material totals. [`JobStore::cleanup`] bounds the number of completed
//! jobs kept on disk.

pub mod error;
pub mod model;
pub mod store;

pub use error::{JobError, JobResult, JobValidationError};
pub use model::{JobStatus, PrintJob};
pub use store::{CleanupReport, JobStore, DEFAULT_MAX_JOBS_TO_KEEP};
