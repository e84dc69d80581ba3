//! Volume control using IAudioEndpointVolume.
//!
//! Provides volume and mute control for audio devices.

use super::device::AudioError;
use super::endpoint::VolumeControl;
use windows::Win32::Media::Audio::{Endpoints::IAudioEndpointVolume, IMMDevice};
use windows::Win32::System::Com::CLSCTX_ALL;

/// Volume controller for a specific device.
pub struct VolumeController {
    endpoint_volume: IAudioEndpointVolume,
}

impl VolumeController {
    /// Create a new VolumeController for the given device.
    pub fn new(device: &IMMDevice) -> Result<Self, AudioError> {
        unsafe {
            let endpoint_volume: IAudioEndpointVolume = device
                .Activate(CLSCTX_ALL, None)
                .map_err(|_| AudioError::NoVolumeControl)?;

            Ok(Self { endpoint_volume })
        }
    }
}

impl VolumeControl for VolumeController {
    fn get_mute(&self) -> Result<bool, AudioError> {
        unsafe {
            let muted = self.endpoint_volume.GetMute()?;
            Ok(muted.as_bool())
        }
    }

    fn set_mute(&self, muted: bool) -> Result<(), AudioError> {
        unsafe {
            self.endpoint_volume.SetMute(muted, std::ptr::null())?;
            Ok(())
        }
    }

    fn set_volume(&self, level: f32) -> Result<(), AudioError> {
        let level = level.clamp(0.0, 1.0);
        unsafe {
            self.endpoint_volume
                .SetMasterVolumeLevelScalar(level, std::ptr::null())?;
            Ok(())
        }
    }
}
