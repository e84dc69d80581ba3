//! Mute - Library
//!
//! Toggle mute on a preferred Windows audio device with a global hotkey.
//!
//! ## Features
//!
//! - Fuzzy-match the preferred capture or render device by name
//! - Keep that device the default for every role as devices come and go
//! - Toggle mute from a system-wide keyboard hook without blocking input
//! - Reflect the mute state in the system tray

pub mod app;
pub mod audio;
pub mod coordinator;
pub mod hotkey;
pub mod platform;
#[cfg(windows)]
pub mod ui;

pub use audio::{AudioError, DeviceEvent, DeviceHandle, DeviceLocator, DeviceRole, Direction};
pub use coordinator::{Command, Coordinator, MuteIndicator, MuteState};
pub use hotkey::{Hotkey, KeystrokeMatcher};
pub use platform::{Settings, SettingsManager};
