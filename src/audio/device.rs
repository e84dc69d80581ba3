//! Audio device data models.
//!
//! Defines the direction, role, and state enums shared by the platform
//! layer and the coordinator, plus the notification events and errors.

use thiserror::Error;

/// Data-flow direction of an endpoint (maps to Windows EDataFlow).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Recording input (microphones)
    Capture,

    /// Playback output (speakers, headphones)
    Render,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Capture => f.write_str("capture"),
            Direction::Render => f.write_str("render"),
        }
    }
}

/// Audio device role (maps to Windows ERole enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DeviceRole {
    /// Used by games, system sounds, most general applications
    Console = 0,

    /// Used by music players, video players
    Multimedia = 1,

    /// Used by Teams, Zoom, Discord, and other VoIP applications
    Communications = 2,
}

impl DeviceRole {
    /// Every role, in the order a device is asserted as default.
    pub const ALL: [DeviceRole; 3] = [
        DeviceRole::Console,
        DeviceRole::Communications,
        DeviceRole::Multimedia,
    ];
}

/// Windows device state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Device is active and available for use
    Active,

    /// Device is disabled in Windows Sound settings
    Disabled,

    /// Device is not present (driver issue)
    NotPresent,

    /// Device is unplugged (for pluggable devices)
    Unplugged,
}

impl DeviceState {
    /// Convert a raw `DEVICE_STATE_*` value.
    pub fn from_raw(state: u32) -> Self {
        match state {
            1 => DeviceState::Active,
            2 => DeviceState::Disabled,
            8 => DeviceState::Unplugged,
            _ => DeviceState::NotPresent,
        }
    }
}

/// Events from the Windows audio system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// Default device changed for a specific direction and role
    DefaultDeviceChanged {
        direction: Direction,
        role: DeviceRole,
        device_id: Option<String>, // None if no default device
    },

    /// A new audio device was connected
    DeviceAdded { device_id: String },

    /// An audio device was disconnected
    DeviceRemoved { device_id: String },

    /// Device state changed (active, disabled, not present, unplugged)
    DeviceStateChanged {
        device_id: String,
        new_state: DeviceState,
    },
}

/// Audio service error types.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Device handle has already been released")]
    Defunct,

    #[error("No device matching \"{name}\"")]
    NotFound { name: String },

    #[error("Volume control not available for device")]
    NoVolumeControl,

    #[error("Failed to set default device for {role:?} role (0x{code:08X})")]
    SetDefaultFailed { role: DeviceRole, code: i32 },

    #[error("COM initialization failed (0x{code:08X})")]
    ComInitFailed { code: i32 },

    #[error("Failed to enumerate devices (0x{code:08X})")]
    EnumerationFailed { code: i32 },

    #[error("Platform call failed (0x{code:08X})")]
    PlatformCallFailed { code: i32 },

    #[error("String conversion error: {0}")]
    StringConversion(String),
}

/// HRESULT_FROM_WIN32(ERROR_NOT_FOUND), returned when no endpoint fills a role.
pub const E_NOTFOUND: i32 = 0x8007_0490_u32 as i32;

impl AudioError {
    /// Platform HRESULT carried by this error, if any.
    pub fn code(&self) -> Option<i32> {
        match self {
            AudioError::SetDefaultFailed { code, .. }
            | AudioError::ComInitFailed { code }
            | AudioError::EnumerationFailed { code }
            | AudioError::PlatformCallFailed { code } => Some(*code),
            _ => None,
        }
    }
}

/// Treat "no such endpoint" as absence and keep every other failure.
pub fn absent_if_not_found<T>(result: Result<T, AudioError>) -> Result<Option<T>, AudioError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.code() == Some(E_NOTFOUND) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(windows)]
impl From<windows::core::Error> for AudioError {
    fn from(err: windows::core::Error) -> Self {
        AudioError::PlatformCallFailed {
            code: err.code().0,
        }
    }
}
