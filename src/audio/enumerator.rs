//! Device enumeration using Windows MMDevice API.
//!
//! Provides COM initialization and the WASAPI implementation of
//! [`AudioSystem`].

use super::device::{absent_if_not_found, AudioError, DeviceRole, DeviceState, Direction};
use super::endpoint::{AudioSystem, Endpoint, VolumeControl};
use super::policy;
use super::volume::VolumeController;
use windows::Win32::Devices::Properties::DEVPKEY_Device_FriendlyName;
use windows::Win32::Media::Audio::{
    eCapture, eCommunications, eConsole, eMultimedia, eRender, EDataFlow, ERole, IMMDevice,
    IMMDeviceEnumerator, MMDeviceEnumerator, DEVICE_STATE_ACTIVE,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoTaskMemFree, CoUninitialize, CLSCTX_ALL,
    COINIT_MULTITHREADED, STGM,
};
use windows::Win32::UI::Shell::PropertiesSystem::{IPropertyStore, PROPERTYKEY};

/// COM initialization guard that uninitializes COM on drop.
pub struct ComGuard {
    initialized: bool,
}

impl ComGuard {
    /// Initialize COM for the current thread.
    pub fn new() -> Result<Self, AudioError> {
        unsafe {
            // Endpoints are shared between the UI thread and the worker
            CoInitializeEx(None, COINIT_MULTITHREADED)
                .ok()
                .map_err(|e| AudioError::ComInitFailed { code: e.code().0 })?;
        }
        Ok(Self { initialized: true })
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if self.initialized {
            unsafe {
                CoUninitialize();
            }
        }
    }
}

fn data_flow(direction: Direction) -> EDataFlow {
    match direction {
        Direction::Capture => eCapture,
        Direction::Render => eRender,
    }
}

fn endpoint_role(role: DeviceRole) -> ERole {
    match role {
        DeviceRole::Console => eConsole,
        DeviceRole::Multimedia => eMultimedia,
        DeviceRole::Communications => eCommunications,
    }
}

/// Device enumerator using Windows MMDevice API.
pub struct WasapiSystem {
    enumerator: IMMDeviceEnumerator,
}

// SAFETY: the enumerator is created and used from multithreaded apartments
// only, where MMDevice objects are free-threaded.
unsafe impl Send for WasapiSystem {}
unsafe impl Sync for WasapiSystem {}

impl WasapiSystem {
    /// Create a new WasapiSystem.
    ///
    /// Note: COM must be initialized before calling this function.
    pub fn new() -> Result<Self, AudioError> {
        unsafe {
            let enumerator: IMMDeviceEnumerator =
                CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)
                    .map_err(|e| AudioError::EnumerationFailed { code: e.code().0 })?;

            Ok(Self { enumerator })
        }
    }

    /// Get the raw IMMDeviceEnumerator for notification registration.
    pub fn raw_enumerator(&self) -> &IMMDeviceEnumerator {
        &self.enumerator
    }
}

impl AudioSystem for WasapiSystem {
    fn active_endpoints(&self, direction: Direction) -> Result<Vec<Box<dyn Endpoint>>, AudioError> {
        unsafe {
            let collection = self
                .enumerator
                .EnumAudioEndpoints(data_flow(direction), DEVICE_STATE_ACTIVE)
                .map_err(|e| AudioError::EnumerationFailed { code: e.code().0 })?;

            let count = collection
                .GetCount()
                .map_err(|e| AudioError::EnumerationFailed { code: e.code().0 })?;

            let mut endpoints: Vec<Box<dyn Endpoint>> = Vec::with_capacity(count as usize);

            for i in 0..count {
                match collection.Item(i) {
                    Ok(device) => endpoints.push(Box::new(WasapiEndpoint::new(device))),
                    Err(e) => tracing::debug!(index = i, "Skipping device: {e}"),
                }
            }

            Ok(endpoints)
        }
    }

    fn default_endpoint(
        &self,
        direction: Direction,
        role: DeviceRole,
    ) -> Result<Option<Box<dyn Endpoint>>, AudioError> {
        let device = unsafe {
            self.enumerator
                .GetDefaultAudioEndpoint(data_flow(direction), endpoint_role(role))
                .map_err(AudioError::from)
        };

        Ok(absent_if_not_found(device)?
            .map(|device| Box::new(WasapiEndpoint::new(device)) as Box<dyn Endpoint>))
    }

    fn set_default_endpoint(&self, device_id: &str, role: DeviceRole) -> Result<(), AudioError> {
        policy::set_default_device(device_id, role)
    }
}

/// An IMMDevice together with its activated volume interface.
pub struct WasapiEndpoint {
    device: IMMDevice,
    volume: Option<VolumeController>,
}

// SAFETY: see `WasapiSystem`.
unsafe impl Send for WasapiEndpoint {}

impl WasapiEndpoint {
    fn new(device: IMMDevice) -> Self {
        let volume = VolumeController::new(&device).ok();
        Self { device, volume }
    }

    /// Get the friendly name of a device from its property store.
    fn get_device_name(&self, props: &IPropertyStore) -> Option<String> {
        unsafe {
            // Convert DEVPROPKEY to PROPERTYKEY
            let key = PROPERTYKEY {
                fmtid: DEVPKEY_Device_FriendlyName.fmtid,
                pid: DEVPKEY_Device_FriendlyName.pid,
            };

            let prop = props.GetValue(&key).ok()?;

            let s = prop.to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        }
    }
}

impl Endpoint for WasapiEndpoint {
    fn id(&self) -> Result<String, AudioError> {
        unsafe {
            let id = self.device.GetId()?;
            let id_string = id.to_string();
            CoTaskMemFree(Some(id.0 as *const _));
            id_string.map_err(|e| AudioError::StringConversion(e.to_string()))
        }
    }

    fn friendly_name(&self) -> Result<String, AudioError> {
        unsafe {
            let props: IPropertyStore = self.device.OpenPropertyStore(STGM(0))?; // STGM_READ = 0
            Ok(self
                .get_device_name(&props)
                .unwrap_or_else(|| "Unknown".to_string()))
        }
    }

    fn state(&self) -> Result<DeviceState, AudioError> {
        unsafe {
            let state = self.device.GetState()?;
            Ok(DeviceState::from_raw(state.0))
        }
    }

    fn volume(&self) -> Option<&dyn VolumeControl> {
        self.volume.as_ref().map(|v| v as &dyn VolumeControl)
    }
}
