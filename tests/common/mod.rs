//! In-memory audio system shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mute_rs::audio::{absent_if_not_found, AudioError, AudioSystem, DeviceRole, DeviceState, Direction, Endpoint, VolumeControl};
use mute_rs::{MuteIndicator, MuteState};
use parking_lot::Mutex;

/// E_FAIL
pub const E_FAIL: i32 = 0x8000_4005_u32 as i32;

/// Shared state of one fake device.
pub struct FakeDevice {
    pub id: String,
    pub name: String,
    pub direction: Direction,
    pub has_volume: bool,
    pub state: Mutex<DeviceState>,
    pub muted: Mutex<bool>,
    pub volume: Mutex<f32>,
}

impl FakeDevice {
    pub fn muted(&self) -> bool {
        *self.muted.lock()
    }

    pub fn volume(&self) -> f32 {
        *self.volume.lock()
    }

    pub fn set_state(&self, state: DeviceState) {
        *self.state.lock() = state;
    }
}

/// Endpoint handed out by [`FakeSystem`]. Counts its own release.
pub struct FakeEndpoint {
    device: Arc<FakeDevice>,
    released: Arc<AtomicUsize>,
}

impl Drop for FakeEndpoint {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl VolumeControl for FakeEndpoint {
    fn get_mute(&self) -> Result<bool, AudioError> {
        Ok(*self.device.muted.lock())
    }

    fn set_mute(&self, muted: bool) -> Result<(), AudioError> {
        *self.device.muted.lock() = muted;
        Ok(())
    }

    fn set_volume(&self, level: f32) -> Result<(), AudioError> {
        *self.device.volume.lock() = level;
        Ok(())
    }
}

impl Endpoint for FakeEndpoint {
    fn id(&self) -> Result<String, AudioError> {
        Ok(self.device.id.clone())
    }

    fn friendly_name(&self) -> Result<String, AudioError> {
        Ok(self.device.name.clone())
    }

    fn state(&self) -> Result<DeviceState, AudioError> {
        Ok(*self.device.state.lock())
    }

    fn volume(&self) -> Option<&dyn VolumeControl> {
        if self.device.has_volume {
            Some(self)
        } else {
            None
        }
    }
}

/// In-memory [`AudioSystem`].
#[derive(Default)]
pub struct FakeSystem {
    devices: Mutex<Vec<Arc<FakeDevice>>>,
    defaults: Mutex<HashMap<(Direction, DeviceRole), String>>,
    set_default_calls: Mutex<Vec<(String, DeviceRole)>>,
    failing_role: Mutex<Option<DeviceRole>>,
    default_lookup_error: Mutex<Option<i32>>,
    enumerations: AtomicUsize,
    released: Arc<AtomicUsize>,
    handed_out: AtomicUsize,
}

impl FakeSystem {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Plug in an active device with a volume interface.
    pub fn add(&self, id: &str, name: &str, direction: Direction) -> Arc<FakeDevice> {
        self.add_device(id, name, direction, true)
    }

    pub fn add_device(&self, id: &str, name: &str, direction: Direction, has_volume: bool) -> Arc<FakeDevice> {
        let device = Arc::new(FakeDevice {
            id: id.to_string(),
            name: name.to_string(),
            direction,
            has_volume,
            state: Mutex::new(DeviceState::Active),
            muted: Mutex::new(false),
            volume: Mutex::new(1.0),
        });
        self.devices.lock().push(device.clone());
        device
    }

    pub fn remove(&self, id: &str) {
        self.devices.lock().retain(|device| device.id != id);
    }

    /// Make `id` the default for every role without recording a call.
    pub fn make_default(&self, id: &str, direction: Direction) {
        let mut defaults = self.defaults.lock();
        for role in DeviceRole::ALL {
            defaults.insert((direction, role), id.to_string());
        }
    }

    pub fn default_for(&self, direction: Direction, role: DeviceRole) -> Option<String> {
        self.defaults.lock().get(&(direction, role)).cloned()
    }

    pub fn fail_role(&self, role: DeviceRole) {
        *self.failing_role.lock() = Some(role);
    }

    /// Make every default lookup fail with `code`.
    pub fn fail_default_lookup(&self, code: i32) {
        *self.default_lookup_error.lock() = Some(code);
    }

    pub fn set_default_calls(&self) -> Vec<(String, DeviceRole)> {
        self.set_default_calls.lock().clone()
    }

    pub fn clear_set_default_calls(&self) {
        self.set_default_calls.lock().clear();
    }

    pub fn enumerations(&self) -> usize {
        self.enumerations.load(Ordering::SeqCst)
    }

    /// Endpoints dropped so far.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Endpoints handed out and not yet dropped.
    pub fn live(&self) -> usize {
        self.handed_out.load(Ordering::SeqCst) - self.released()
    }

    fn endpoint(&self, device: Arc<FakeDevice>) -> Box<dyn Endpoint> {
        self.handed_out.fetch_add(1, Ordering::SeqCst);
        Box::new(FakeEndpoint {
            device,
            released: self.released.clone(),
        })
    }
}

impl AudioSystem for FakeSystem {
    fn active_endpoints(&self, direction: Direction) -> Result<Vec<Box<dyn Endpoint>>, AudioError> {
        self.enumerations.fetch_add(1, Ordering::SeqCst);
        let devices: Vec<_> = self
            .devices
            .lock()
            .iter()
            .filter(|d| d.direction == direction && *d.state.lock() == DeviceState::Active)
            .cloned()
            .collect();
        Ok(devices.into_iter().map(|d| self.endpoint(d)).collect())
    }

    fn default_endpoint(
        &self,
        direction: Direction,
        role: DeviceRole,
    ) -> Result<Option<Box<dyn Endpoint>>, AudioError> {
        if let Some(code) = *self.default_lookup_error.lock() {
            return absent_if_not_found(Err(AudioError::PlatformCallFailed { code }));
        }

        let Some(id) = self.default_for(direction, role) else {
            return Ok(None);
        };
        let device = self.devices.lock().iter().find(|d| d.id == id).cloned();
        Ok(device.map(|d| self.endpoint(d)))
    }

    fn set_default_endpoint(&self, device_id: &str, role: DeviceRole) -> Result<(), AudioError> {
        self.set_default_calls
            .lock()
            .push((device_id.to_string(), role));

        if *self.failing_role.lock() == Some(role) {
            return Err(AudioError::PlatformCallFailed { code: E_FAIL });
        }

        let direction = self
            .devices
            .lock()
            .iter()
            .find(|d| d.id == device_id)
            .map(|d| d.direction)
            .ok_or(AudioError::PlatformCallFailed { code: E_FAIL })?;
        self.defaults
            .lock()
            .insert((direction, role), device_id.to_string());
        Ok(())
    }
}

/// Records every state shown.
#[derive(Default)]
pub struct RecordingIndicator {
    states: Mutex<Vec<MuteState>>,
}

impl RecordingIndicator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn states(&self) -> Vec<MuteState> {
        self.states.lock().clone()
    }

    pub fn last(&self) -> Option<MuteState> {
        self.states.lock().last().copied()
    }
}

impl MuteIndicator for RecordingIndicator {
    fn show(&self, state: MuteState) {
        self.states.lock().push(state);
    }
}
