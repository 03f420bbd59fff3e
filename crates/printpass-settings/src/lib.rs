//! PrintPass Settings Crate
//!
//! Handles configuration for the analyzer, the device registry, the print
//! job store and logging.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, AnalyzerSettings, Config, DeviceSettings, JobSettings, LoggingSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
