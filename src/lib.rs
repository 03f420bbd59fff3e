//! # PrintPass
//!
//! Data preparation for 3D-printer digital product passports:
//! - G-code analysis: embedded preview thumbnails (QOI and PNG), slicer
//!   summary values and a per-part split of the job
//! - Smart tips: one prioritised piece of advice per printer snapshot
//! - A JSON-file device registry
//! - Print job records with a retention limit
//!
//! ## Architecture
//!
//! PrintPass is organized as a workspace with multiple crates:
//!
//! 1. **printpass-core** - Telemetry data model and the G-code error type
//! 2. **printpass-gcode** - QOI decoder, thumbnail extraction, metadata and part analysis
//! 3. **printpass-tips** - Smart tip rules and selection engine
//! 4. **printpass-settings** - Configuration files
//! 5. **printpass-devicedb** - Device registry
//! 6. **printpass-jobdb** - Print job store and retention
//! 7. **printpass** - The command-line binary that ties them together

pub mod cli;

pub use printpass_core::{GcodeError, JobDetails, PrinterSnapshot, PrinterStatus};
pub use printpass_devicedb::{Device, DeviceError, DeviceManager, DeviceUpdate};
pub use printpass_jobdb::{CleanupReport, JobStatus, JobStore, PrintJob};
pub use printpass_gcode::{
    analyze_file, analyze_gcode, decode_qoi, extract_thumbnail, GcodeAnalysis, QoiImage,
    SlicerMetadata, ThumbnailOptions,
};
pub use printpass_settings::{Config, LoggingSettings};
pub use printpass_tips::{evaluate_smart_tips, TipEngine, TipMatch};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, leaving stdout for command results
/// - RUST_LOG environment variable support, falling back to `settings.level`
/// - JSON lines when `settings.json` is set
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .json();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .compact();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
