//! UI module for the system tray.

pub mod tray;

pub use tray::{ThreadMessageIndicator, TrayError, TrayManager, WM_MUTE_STATE};
