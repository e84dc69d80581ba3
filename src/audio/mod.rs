//! Audio module for endpoint tracking.
//!
//! This module provides the device handle, the name-based locator, and the
//! platform seam they run against. The Windows Core Audio implementation of
//! that seam is compiled on Windows only.

pub mod device;
pub mod endpoint;
pub mod handle;
pub mod locator;

#[cfg(windows)]
pub mod enumerator;
#[cfg(windows)]
pub mod notifications;
#[cfg(windows)]
pub mod policy;
#[cfg(windows)]
pub mod volume;

pub use device::{absent_if_not_found, AudioError, DeviceEvent, DeviceRole, DeviceState, Direction, E_NOTFOUND};
pub use endpoint::{AudioSystem, Endpoint, VolumeControl};
pub use handle::DeviceHandle;
pub use locator::{levenshtein, DeviceLocator, MAX_NAME_DISTANCE};

#[cfg(windows)]
pub use enumerator::{ComGuard, WasapiSystem};
#[cfg(windows)]
pub use notifications::NotificationRegistration;
