//! JSON-file-backed device registry

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{DeviceError, DeviceResult};
use crate::model::{Device, DeviceUpdate};

/// Registered devices keyed by `device_id`.
///
/// Changes are held in memory until [`DeviceManager::save`] writes the file.
#[derive(Debug)]
pub struct DeviceManager {
    path: PathBuf,
    devices: RwLock<HashMap<String, Device>>,
}

impl DeviceManager {
    /// An empty registry that will be saved to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            devices: RwLock::new(HashMap::new()),
        }
    }

    /// Load the registry at `path`; a missing file gives an empty registry.
    pub fn load(path: impl Into<PathBuf>) -> DeviceResult<Self> {
        let manager = Self::new(path);
        if !manager.path.exists() {
            debug!("No device registry at {}", manager.path.display());
            return Ok(manager);
        }

        let content =
            std::fs::read_to_string(&manager.path).map_err(|e| DeviceError::LoadError {
                path: manager.path.display().to_string(),
                reason: e.to_string(),
            })?;
        let devices: Vec<Device> =
            serde_json::from_str(&content).map_err(|e| DeviceError::LoadError {
                path: manager.path.display().to_string(),
                reason: e.to_string(),
            })?;

        {
            let mut map = manager.devices.write();
            for device in devices {
                map.insert(device.device_id.clone(), device);
            }
        }
        debug!(
            "Loaded {} devices from {}",
            manager.len(),
            manager.path.display()
        );
        Ok(manager)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the registry as a pretty JSON array, in listing order
    pub fn save(&self) -> DeviceResult<()> {
        let content = serde_json::to_string_pretty(&self.list())?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content)
            .map_err(|e| DeviceError::SaveError(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }

    /// All devices by friendly name; unnamed devices last, ties by id
    pub fn list(&self) -> Vec<Device> {
        let mut devices: Vec<Device> = self.devices.read().values().cloned().collect();
        devices.sort_by(|a, b| {
            match (&a.friendly_name, &b.friendly_name) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then_with(|| a.device_id.cmp(&b.device_id))
        });
        devices
    }

    pub fn get(&self, device_id: &str) -> DeviceResult<Device> {
        self.devices
            .read()
            .get(device_id)
            .cloned()
            .ok_or_else(|| DeviceError::NotFound(device_id.to_string()))
    }

    /// Register a new device and return its id
    pub fn add(&self, mut device: Device) -> DeviceResult<String> {
        device.normalize();
        device.validate()?;

        let mut devices = self.devices.write();
        if devices.contains_key(&device.device_id) {
            return Err(DeviceError::AlreadyExists(device.device_id));
        }
        let id = device.device_id.clone();
        devices.insert(id.clone(), device);
        info!("Added device {}", id);
        Ok(id)
    }

    /// Apply a partial update and return the updated device
    pub fn update(&self, device_id: &str, patch: &DeviceUpdate) -> DeviceResult<Device> {
        if patch.is_empty() {
            return Err(DeviceError::EmptyUpdate);
        }

        let mut devices = self.devices.write();
        let current = devices
            .get(device_id)
            .ok_or_else(|| DeviceError::NotFound(device_id.to_string()))?;

        let mut updated = current.clone();
        patch.apply_to(&mut updated);
        updated.normalize();
        updated.validate()?;

        devices.insert(device_id.to_string(), updated.clone());
        info!("Updated device {}", device_id);
        Ok(updated)
    }

    /// Remove a device and return it
    pub fn delete(&self, device_id: &str) -> DeviceResult<Device> {
        let removed = self
            .devices
            .write()
            .remove(device_id)
            .ok_or_else(|| DeviceError::NotFound(device_id.to_string()))?;
        info!("Deleted device {}", device_id);
        Ok(removed)
    }
}
