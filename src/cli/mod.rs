//! Command-line interface.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, CliCommand, DeviceAction, JobAction};
pub use handlers::run;
