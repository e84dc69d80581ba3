//! Platform-facing helpers.
//!
//! This module contains the settings file and the tray icon artwork.

pub mod icons;
pub mod settings;

pub use icons::IconKind;
pub use settings::{DeviceSettings, Settings, SettingsManager};
