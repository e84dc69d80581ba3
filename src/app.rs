//! Application wiring and lifecycle.
//!
//! `run` owns the UI thread: it creates the tray icon, installs the keyboard
//! hook and pumps messages until "Quit" is chosen. Device work happens on a
//! dedicated worker thread fed through one command channel.

use crate::audio::Direction;
use crate::hotkey::{Hotkey, VK_NEXT, VK_PRIOR};
use crate::platform::IconKind;

/// Default log filter when `MUTE_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// What a binary toggles and how.
#[derive(Debug, Clone)]
pub struct Profile {
    pub title: &'static str,
    pub direction: Direction,
    pub hotkey: Hotkey,
    pub icon: IconKind,
}

impl Profile {
    /// Microphone mute on Page Up.
    pub fn mute() -> Self {
        Self {
            title: "Mute",
            direction: Direction::Capture,
            hotkey: Hotkey::single(VK_PRIOR),
            icon: IconKind::Microphone,
        }
    }

    /// Speaker mute on Page Down.
    pub fn deafen() -> Self {
        Self {
            title: "Deafen",
            direction: Direction::Render,
            hotkey: Hotkey::single(VK_NEXT),
            icon: IconKind::Speaker,
        }
    }
}

/// Install the global tracing subscriber.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MUTE_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .init();
}

#[cfg(windows)]
pub use windows_app::run;

#[cfg(windows)]
mod windows_app {
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;

    use anyhow::{Context, Result};
    use tracing::{info, warn};
    use windows::Win32::System::Threading::GetCurrentThreadId;
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, GetMessageW, PostQuitMessage, TranslateMessage, MSG,
    };

    use super::Profile;
    use crate::audio::{ComGuard, DeviceLocator, NotificationRegistration, WasapiSystem};
    use crate::coordinator::{Command, Coordinator};
    use crate::hotkey::KeyboardHook;
    use crate::platform::{Settings, SettingsManager};
    use crate::ui::{ThreadMessageIndicator, TrayManager, WM_MUTE_STATE};

    fn load_settings() -> Settings {
        match SettingsManager::new().and_then(|manager| manager.load_or_create()) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Using default settings: {e:#}");
                Settings::default()
            }
        }
    }

    /// Run the application until the tray's "Quit" item is chosen.
    pub fn run(profile: Profile) -> Result<()> {
        let _com = ComGuard::new().context("COM initialization failed")?;

        let settings = load_settings().for_direction(profile.direction).clone();
        info!(
            direction = %profile.direction,
            "Preferred device: {} (volume {})", settings.name, settings.volume
        );

        let system = Arc::new(WasapiSystem::new().context("Failed to create the device enumerator")?);

        // The tray creates this thread's message queue, which the indicator posts to
        let mut tray = TrayManager::new(profile.icon);
        tray.create(profile.title)?;

        let indicator = Arc::new(ThreadMessageIndicator::new(unsafe { GetCurrentThreadId() }));
        let coordinator = Arc::new(Coordinator::new(
            profile.direction,
            settings,
            DeviceLocator::new(system.clone()),
            indicator,
        ));
        coordinator.start();

        let (commands, receiver) = mpsc::channel();

        let registration = NotificationRegistration::register(system.raw_enumerator(), commands.clone())
            .context("Failed to register for device notifications")?;

        let worker = {
            let coordinator = coordinator.clone();
            thread::Builder::new()
                .name("mute-worker".to_string())
                .spawn(move || {
                    let _com = ComGuard::new()
                        .map_err(|e| warn!("Worker COM initialization failed: {e}"))
                        .ok();
                    coordinator.run(receiver);
                })
                .context("Failed to spawn the worker thread")?
        };

        let hook = KeyboardHook::install(profile.hotkey.clone(), commands.clone())
            .context("Failed to install the keyboard hook")?;

        info!("{} is running", profile.title);
        pump_messages(&mut tray);

        drop(hook);
        drop(registration);

        // The notification client may outlive its registration, so the
        // channel cannot be relied on to close
        if commands.send(Command::Shutdown).is_err() {
            warn!("Worker already stopped");
        }
        if worker.join().is_err() {
            warn!("Worker thread panicked");
        }

        coordinator.shutdown();
        info!("{} stopped", profile.title);

        Ok(())
    }

    fn pump_messages(tray: &mut TrayManager) {
        unsafe {
            let mut msg = MSG::default();
            while GetMessageW(&mut msg, None, 0, 0).as_bool() {
                if msg.message == WM_MUTE_STATE {
                    if let Err(e) = tray.set_muted(msg.wParam.0 != 0) {
                        warn!("Failed to update the tray icon: {e}");
                    }
                    continue;
                }

                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);

                if tray.quit_requested() {
                    PostQuitMessage(0);
                }
            }
        }
    }
}
