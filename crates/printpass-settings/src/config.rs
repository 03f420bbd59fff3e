//! Configuration management for PrintPass
//!
//! Supports JSON and TOML files, chosen by extension. Every section and field
//! falls back to its default, so a file only needs the values it changes.
//!
//! Configuration is organized into sections:
//! - Analyzer output (preview directory and URL prefix)
//! - Device registry location
//! - Print job store location and retention
//! - Logging level and format

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

const APP_DIR: &str = "printpass";

/// Where the analyzer writes thumbnails and how it links to them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// Directory receiving `{jobid}.png`
    pub preview_dir: PathBuf,
    /// URL path prefix for the returned thumbnail link
    pub preview_url_prefix: String,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            preview_dir: PathBuf::from("/app/gcode_previews"),
            preview_url_prefix: "/gcode_previews".to_string(),
        }
    }
}

/// Device registry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// JSON file holding the registered devices
    pub registry_path: PathBuf,
}

fn data_file(name: &str) -> PathBuf {
    let mut path = dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push(name);
    path
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            registry_path: data_file("devices.json"),
        }
    }
}

/// Print job store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    /// JSON file holding the print job records
    pub store_path: PathBuf,
    /// Completed jobs kept by `jobs cleanup`
    pub max_keep: usize,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            store_path: data_file("jobs.json"),
            max_keep: 144,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub analyzer: AnalyzerSettings,
    pub devices: DeviceSettings,
    pub jobs: JobSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Default location of the configuration file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise the default file if it exists,
    /// otherwise the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match default_config_path() {
            Some(default) if default.is_file() => Self::load_from_file(&default),
            _ => Ok(Self::default()),
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.analyzer.preview_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingKey("analyzer.preview_dir".to_string()));
        }

        if !self.analyzer.preview_url_prefix.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                key: "analyzer.preview_url_prefix".to_string(),
                value: self.analyzer.preview_url_prefix.clone(),
            });
        }

        if self.devices.registry_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingKey("devices.registry_path".to_string()));
        }

        if self.jobs.store_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingKey("jobs.store_path".to_string()));
        }

        if self.jobs.max_keep == 0 {
            return Err(ConfigError::InvalidValue {
                key: "jobs.max_keep".to_string(),
                value: "0".to_string(),
            });
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::MissingKey("logging.level".to_string()));
        }

        Ok(())
    }
}
