//! Global hotkey detection.
//!
//! [`KeystrokeMatcher`] decides whether the trailing keys equal the hotkey;
//! on Windows, [`KeyboardHook`] feeds it from a system-wide keyboard hook.

#[cfg(windows)]
pub mod hook;
pub mod matcher;

#[cfg(windows)]
pub use hook::KeyboardHook;
pub use matcher::{Hotkey, HotkeyError, KeyCode, KeystrokeMatcher, VK_NEXT, VK_PRIOR};
