pub mod error;
pub mod manager;
pub mod model;

pub use error::{DeviceError, DeviceResult, DeviceValidationError, ValidationResult};
pub use manager::DeviceManager;
pub use model::{Device, DeviceUpdate};
