//! Tracks the preferred device for one direction.
//!
//! The coordinator owns the single [`DeviceHandle`] for its direction and
//! reacts to device notifications and hotkey toggles. Every access to the
//! handle, including release, happens under one lock. Platform callbacks
//! never call in directly; they enqueue a [`Command`] that the worker loop
//! in [`Coordinator::run`] applies one at a time.

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::audio::{DeviceEvent, DeviceHandle, DeviceLocator, DeviceRole, DeviceState, Direction};
use crate::platform::DeviceSettings;

/// Mute state shown by the tray icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteState {
    Muted,
    Unmuted,
}

impl From<bool> for MuteState {
    fn from(muted: bool) -> Self {
        if muted {
            MuteState::Muted
        } else {
            MuteState::Unmuted
        }
    }
}

/// Receives mute state changes for display.
pub trait MuteIndicator: Send + Sync {
    fn show(&self, state: MuteState);
}

/// Work submitted to the coordinator worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The hotkey matched
    ToggleMute,

    /// A device notification arrived
    Device(DeviceEvent),

    /// Stop the worker once earlier commands are applied
    Shutdown,
}

/// Owns the tracked device for one direction.
pub struct Coordinator {
    direction: Direction,
    settings: DeviceSettings,
    locator: DeviceLocator,
    indicator: Arc<dyn MuteIndicator>,
    tracked: Mutex<Option<DeviceHandle>>,
}

impl Coordinator {
    pub fn new(
        direction: Direction,
        settings: DeviceSettings,
        locator: DeviceLocator,
        indicator: Arc<dyn MuteIndicator>,
    ) -> Self {
        Self {
            direction,
            settings,
            locator,
            indicator,
            tracked: Mutex::new(None),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Resolve the preferred device and bring it into its startup state.
    pub fn start(&self) {
        let mut tracked = self.tracked.lock();

        if let Some(current) = self.locator.get_os_default(self.direction, DeviceRole::Console) {
            info!(direction = %self.direction, "Current default device: {}", current.name());
        }

        let handle = match self.locator.require_match(&self.settings.name, self.direction) {
            Ok(handle) => handle,
            Err(e) => {
                info!(direction = %self.direction, "{e}");
                self.indicator.show(MuteState::Muted);
                return;
            }
        };

        info!(direction = %self.direction, "Tracking device: {}", handle.name());

        if let Err(e) = handle.set_volume(self.settings.volume) {
            warn!("Failed to set the startup volume: {e}");
        }

        match handle.is_default_all_roles() {
            Ok(true) => debug!("Device is already the default for every role"),
            Ok(false) => self.assert_default(&handle),
            Err(e) => {
                warn!("Failed to read the default device: {e}");
                self.assert_default(&handle);
            }
        }

        self.indicator.show(handle.is_muted().into());
        *tracked = Some(handle);
    }

    /// Apply commands until [`Command::Shutdown`] arrives or every sender
    /// has been dropped.
    pub fn run(&self, commands: Receiver<Command>) {
        while let Ok(command) = commands.recv() {
            match command {
                Command::ToggleMute => {
                    self.toggle_mute();
                }
                Command::Device(event) => self.handle_event(event),
                Command::Shutdown => {
                    debug!("Worker stopping");
                    return;
                }
            }
        }
        debug!("Command channel closed");
    }

    /// Flip the tracked device's mute state. Returns the new state, or
    /// `None` if there is no device or the toggle failed.
    pub fn toggle_mute(&self) -> Option<bool> {
        let tracked = self.tracked.lock();
        let Some(handle) = tracked.as_ref() else {
            info!("No device to toggle.");
            return None;
        };

        match handle.toggle_mute() {
            Ok(muted) => {
                self.indicator.show(muted.into());
                Some(muted)
            }
            Err(e) => {
                warn!(device = %handle.name(), "Failed to toggle mute: {e}");
                None
            }
        }
    }

    /// React to one device notification.
    pub fn handle_event(&self, event: DeviceEvent) {
        match event {
            DeviceEvent::DefaultDeviceChanged {
                direction,
                role,
                device_id,
            } => self.on_default_changed(direction, role, device_id),
            DeviceEvent::DeviceAdded { device_id } => self.on_added(&device_id),
            DeviceEvent::DeviceRemoved { device_id } => self.on_removed(&device_id),
            DeviceEvent::DeviceStateChanged {
                device_id,
                new_state,
            } => self.on_state_changed(&device_id, new_state),
        }
    }

    fn on_default_changed(&self, direction: Direction, role: DeviceRole, device_id: Option<String>) {
        if direction != self.direction {
            return;
        }

        let tracked = self.tracked.lock();
        let Some(handle) = tracked.as_ref() else {
            return;
        };

        if device_id.as_deref().is_some_and(|id| handle.is_device(id)) {
            return;
        }

        info!(?role, "The default device was changed.");

        match handle.is_enabled() {
            Ok(true) => self.assert_default(handle),
            Ok(false) => debug!(device = %handle.name(), "Tracked device is not active"),
            Err(e) => warn!(device = %handle.name(), "Failed to read device state: {e}"),
        }
    }

    fn on_added(&self, device_id: &str) {
        info!(device_id, "A device was added.");

        let mut tracked = self.tracked.lock();
        if tracked.is_some() {
            return;
        }

        let handle = match self.locator.require_match(&self.settings.name, self.direction) {
            Ok(handle) => handle,
            Err(e) => {
                debug!("{e}");
                return;
            }
        };

        info!(direction = %self.direction, "Tracking device: {}", handle.name());
        self.assert_default(&handle);
        self.indicator.show(handle.is_muted().into());
        *tracked = Some(handle);
    }

    fn on_removed(&self, device_id: &str) {
        info!(device_id, "A device was removed.");

        let mut tracked = self.tracked.lock();
        let is_tracked = tracked
            .as_ref()
            .is_some_and(|handle| handle.is_device(device_id));
        if !is_tracked {
            return;
        }

        if let Some(mut handle) = tracked.take() {
            info!("Tracked device {} is gone.", handle.name());
            handle.release();
        }
        self.indicator.show(MuteState::Muted);
    }

    fn on_state_changed(&self, device_id: &str, state: DeviceState) {
        // Removal is driven by `DeviceRemoved` alone; a device that is only
        // disabled or unplugged stays tracked.
        match state {
            DeviceState::Active => debug!(device_id, "A device is now active."),
            DeviceState::Disabled => info!(device_id, "A device was disabled."),
            DeviceState::NotPresent => info!(device_id, "A device is not present."),
            DeviceState::Unplugged => info!(device_id, "A device was unplugged."),
        }
    }

    fn assert_default(&self, handle: &DeviceHandle) {
        match handle.set_as_default() {
            Ok(()) => info!(device = %handle.name(), "Set as the default device."),
            Err(e) => warn!(device = %handle.name(), "Failed to set the default device: {e}"),
        }
    }

    /// Whether a device is currently tracked.
    pub fn is_tracking(&self) -> bool {
        self.tracked.lock().is_some()
    }

    /// ID of the tracked device.
    pub fn tracked_id(&self) -> Option<String> {
        self.tracked
            .lock()
            .as_ref()
            .and_then(|handle| handle.identifier().ok())
    }

    /// Live mute state of the tracked device, false if there is none.
    pub fn is_muted(&self) -> bool {
        self.tracked
            .lock()
            .as_ref()
            .map_or(false, |handle| handle.is_muted())
    }

    /// Release the tracked device. Later calls do nothing.
    pub fn shutdown(&self) {
        if let Some(mut handle) = self.tracked.lock().take() {
            info!("Releasing {}", handle.name());
            handle.release();
        }
    }
}
