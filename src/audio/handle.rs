//! Owned handle to a single tracked endpoint.

use std::sync::Arc;

use super::device::{AudioError, DeviceRole, DeviceState, Direction};
use super::endpoint::{AudioSystem, Endpoint, VolumeControl};

/// A resolved audio endpoint.
///
/// The handle owns the endpoint's native resources. [`DeviceHandle::release`]
/// frees them; afterwards the handle is *defunct* and every operation
/// degrades instead of faulting. Dropping the handle releases it as well.
pub struct DeviceHandle {
    system: Arc<dyn AudioSystem>,
    direction: Direction,
    name: String,
    endpoint: Option<Box<dyn Endpoint>>,
}

impl DeviceHandle {
    /// Wrap an endpoint that has already been resolved.
    pub fn new(
        system: Arc<dyn AudioSystem>,
        direction: Direction,
        name: String,
        endpoint: Box<dyn Endpoint>,
    ) -> Self {
        Self {
            system,
            direction,
            name,
            endpoint: Some(endpoint),
        }
    }

    /// Friendly name captured when the handle was resolved.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// True once [`release`](Self::release) has run.
    pub fn is_defunct(&self) -> bool {
        self.endpoint.is_none()
    }

    fn endpoint(&self) -> Result<&dyn Endpoint, AudioError> {
        self.endpoint.as_deref().ok_or(AudioError::Defunct)
    }

    fn volume(&self) -> Result<&dyn VolumeControl, AudioError> {
        self.endpoint()
            .ok()
            .and_then(|endpoint| endpoint.volume())
            .ok_or(AudioError::NoVolumeControl)
    }

    /// Live mute state. A defunct handle reads as unmuted.
    pub fn is_muted(&self) -> bool {
        self.volume()
            .and_then(|volume| volume.get_mute())
            .unwrap_or(false)
    }

    /// Mute the device. Returns true only if the state changed.
    pub fn mute(&self) -> bool {
        self.transition_mute(true)
    }

    /// Unmute the device. Returns true only if the state changed.
    pub fn unmute(&self) -> bool {
        self.transition_mute(false)
    }

    fn transition_mute(&self, muted: bool) -> bool {
        let Ok(volume) = self.volume() else {
            return false;
        };

        match volume.get_mute() {
            Ok(current) if current != muted => volume.set_mute(muted).is_ok(),
            _ => false,
        }
    }

    /// Flip the mute state. Returns the new state.
    pub fn toggle_mute(&self) -> Result<bool, AudioError> {
        let volume = self.volume()?;
        let muted = !volume.get_mute()?;
        volume.set_mute(muted)?;
        Ok(muted)
    }

    /// Set the master volume from a percentage (clamped to 100).
    pub fn set_volume(&self, level: u8) -> Result<(), AudioError> {
        let scalar = f32::from(level.min(100)) / 100.0;
        self.volume()?.set_volume(scalar)
    }

    /// Platform endpoint ID.
    pub fn identifier(&self) -> Result<String, AudioError> {
        self.endpoint()?.id()
    }

    /// Whether this handle refers to the endpoint with `device_id`.
    pub fn is_device(&self, device_id: &str) -> bool {
        self.identifier().map_or(false, |id| id == device_id)
    }

    /// Whether the endpoint is active (not disabled, unplugged or missing).
    pub fn is_enabled(&self) -> Result<bool, AudioError> {
        Ok(self.endpoint()?.state()? == DeviceState::Active)
    }

    /// Whether the endpoint is the OS default for `role`.
    pub fn is_default(&self, role: DeviceRole) -> Result<bool, AudioError> {
        let id = self.identifier()?;
        let default_id = self.system.default_endpoint_id(self.direction, role)?;
        Ok(default_id.as_deref() == Some(id.as_str()))
    }

    /// Whether the endpoint is the default for console, communications and
    /// multimedia at once.
    pub fn is_default_all_roles(&self) -> Result<bool, AudioError> {
        for role in DeviceRole::ALL {
            if !self.is_default(role)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Make the endpoint the default for every role.
    ///
    /// Stops at the first role that fails; roles assigned before it keep
    /// the new default.
    pub fn set_as_default(&self) -> Result<(), AudioError> {
        let id = self.identifier()?;
        for role in DeviceRole::ALL {
            self.system.set_default_endpoint(&id, role)?;
        }
        Ok(())
    }

    /// Free the native resources. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(endpoint) = self.endpoint.take() {
            tracing::debug!(device = %self.name, "Releasing device handle");
            drop(endpoint);
        }
    }
}

impl std::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("name", &self.name)
            .field("direction", &self.direction)
            .field("defunct", &self.is_defunct())
            .finish()
    }
}
