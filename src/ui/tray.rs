//! System tray icon management.
//!
//! The tray icon lives on the UI thread. Other threads report mute state
//! through [`ThreadMessageIndicator`], which posts [`WM_MUTE_STATE`] to that
//! thread's message queue.

use thiserror::Error;
use tray_icon::{
    menu::{Menu, MenuEvent, MenuId, MenuItem},
    Icon, TrayIcon, TrayIconBuilder,
};
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{PostThreadMessageW, WM_APP};

use crate::coordinator::{MuteIndicator, MuteState};
use crate::platform::icons::{self, IconKind};

/// Thread message carrying a new mute state in `wParam` (1 = muted).
pub const WM_MUTE_STATE: u32 = WM_APP + 1;

/// Tray service error types.
#[derive(Debug, Error)]
pub enum TrayError {
    #[error("Failed to create tray icon: {0}")]
    CreateFailed(String),

    #[error("Failed to load icon resource: {0}")]
    IconLoadFailed(String),

    #[error("Failed to create menu: {0}")]
    MenuFailed(String),
}

/// System tray manager.
pub struct TrayManager {
    kind: IconKind,
    tray_icon: Option<TrayIcon>,
    quit_menu_id: Option<MenuId>,
    muted: Option<bool>,
}

impl TrayManager {
    /// Create a new TrayManager.
    pub fn new(kind: IconKind) -> Self {
        Self {
            kind,
            tray_icon: None,
            quit_menu_id: None,
            muted: None,
        }
    }

    /// Create and show the tray icon.
    pub fn create(&mut self, tooltip: &str) -> Result<(), TrayError> {
        // Neutral until the coordinator reports the first state
        let icon = self.create_icon(true)?;

        let menu = Menu::new();
        let quit_item = MenuItem::new("Quit", true, None);
        self.quit_menu_id = Some(quit_item.id().clone());
        menu.append(&quit_item)
            .map_err(|e| TrayError::MenuFailed(e.to_string()))?;

        let tray_icon = TrayIconBuilder::new()
            .with_icon(icon)
            .with_tooltip(tooltip)
            .with_menu(Box::new(menu))
            .build()
            .map_err(|e| TrayError::CreateFailed(e.to_string()))?;

        self.tray_icon = Some(tray_icon);

        Ok(())
    }

    /// Update the icon for a new mute state.
    pub fn set_muted(&mut self, muted: bool) -> Result<(), TrayError> {
        if self.muted == Some(muted) {
            return Ok(());
        }

        let icon = self.create_icon(muted)?;
        if let Some(tray) = &self.tray_icon {
            tray.set_icon(Some(icon))
                .map_err(|e| TrayError::CreateFailed(e.to_string()))?;
        }
        self.muted = Some(muted);

        Ok(())
    }

    /// Drain pending menu events. Returns true if "Quit" was chosen.
    pub fn quit_requested(&self) -> bool {
        let mut quit = false;
        while let Ok(event) = MenuEvent::receiver().try_recv() {
            if Some(&event.id) == self.quit_menu_id.as_ref() {
                quit = true;
            }
        }
        quit
    }

    fn create_icon(&self, muted: bool) -> Result<Icon, TrayError> {
        icons::create_icon(self.kind, muted).map_err(TrayError::IconLoadFailed)
    }
}

/// [`MuteIndicator`] that forwards state to the UI thread's message queue.
pub struct ThreadMessageIndicator {
    thread_id: u32,
}

impl ThreadMessageIndicator {
    pub fn new(thread_id: u32) -> Self {
        Self { thread_id }
    }
}

impl MuteIndicator for ThreadMessageIndicator {
    fn show(&self, state: MuteState) {
        let muted = usize::from(state == MuteState::Muted);
        unsafe {
            if let Err(e) =
                PostThreadMessageW(self.thread_id, WM_MUTE_STATE, WPARAM(muted), LPARAM(0))
            {
                tracing::warn!("Failed to post mute state: {e}");
            }
        }
    }
}
