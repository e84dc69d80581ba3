//! Platform seam for audio endpoints.
//!
//! The coordinator and locator only talk to these traits. The WASAPI
//! implementation lives in [`super::enumerator`]; tests provide in-memory
//! ones.

use super::device::{AudioError, DeviceRole, DeviceState, Direction};

/// Mute and volume control for one endpoint.
pub trait VolumeControl {
    /// Get the current mute state.
    fn get_mute(&self) -> Result<bool, AudioError>;

    /// Set the mute state.
    fn set_mute(&self, muted: bool) -> Result<(), AudioError>;

    /// Set the master volume as a scalar (0.0 to 1.0).
    fn set_volume(&self, level: f32) -> Result<(), AudioError>;
}

/// One physical or logical audio endpoint.
///
/// Dropping the value releases the native resources behind it.
pub trait Endpoint: Send {
    /// Platform endpoint ID, stable for the lifetime of the endpoint.
    fn id(&self) -> Result<String, AudioError>;

    /// Human-readable device name.
    fn friendly_name(&self) -> Result<String, AudioError>;

    /// Current device state.
    fn state(&self) -> Result<DeviceState, AudioError>;

    /// Volume interface, if the endpoint exposes one.
    fn volume(&self) -> Option<&dyn VolumeControl>;
}

/// Endpoint enumeration and default-device policy.
pub trait AudioSystem: Send + Sync {
    /// All endpoints of `direction` that are currently active, in
    /// enumeration order.
    fn active_endpoints(&self, direction: Direction) -> Result<Vec<Box<dyn Endpoint>>, AudioError>;

    /// The default endpoint for `direction` and `role`, if there is one.
    fn default_endpoint(
        &self,
        direction: Direction,
        role: DeviceRole,
    ) -> Result<Option<Box<dyn Endpoint>>, AudioError>;

    /// Make `device_id` the default endpoint for `role`.
    fn set_default_endpoint(&self, device_id: &str, role: DeviceRole) -> Result<(), AudioError>;

    /// ID of the default endpoint for `direction` and `role`.
    fn default_endpoint_id(
        &self,
        direction: Direction,
        role: DeviceRole,
    ) -> Result<Option<String>, AudioError> {
        match self.default_endpoint(direction, role)? {
            Some(endpoint) => endpoint.id().map(Some),
            None => Ok(None),
        }
    }
}
