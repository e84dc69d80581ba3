//! Device change notifications using IMMNotificationClient.
//!
//! The callbacks run on a thread owned by the audio service. They only
//! convert their arguments and enqueue a [`Command`]; all handling happens
//! on the coordinator worker.

use super::device::{DeviceEvent, DeviceRole, DeviceState, Direction};
use crate::coordinator::Command;
use std::sync::mpsc::Sender;
use windows::core::{implement, PCWSTR};
use windows::Win32::Media::Audio::{
    eCapture, eCommunications, eConsole, eRender, EDataFlow, ERole, IMMDeviceEnumerator,
    IMMNotificationClient, IMMNotificationClient_Impl, DEVICE_STATE,
};
// Re-export windows_core so the implement macro can find it
#[allow(unused_imports)]
use windows_core;

/// Forwards endpoint notifications to the coordinator's command channel.
#[implement(IMMNotificationClient)]
struct DeviceNotificationClient {
    commands: Sender<Command>,
}

impl DeviceNotificationClient {
    fn forward(&self, event: DeviceEvent) {
        // The receiver is gone only during shutdown
        if self.commands.send(Command::Device(event)).is_err() {
            tracing::debug!("Dropping device notification after shutdown");
        }
    }
}

/// Copy a callback's device ID out of the borrowed wide string.
fn read_device_id(raw: &PCWSTR) -> Option<String> {
    if raw.is_null() {
        return None;
    }
    unsafe { raw.to_string().ok() }
}

fn direction_of(flow: EDataFlow) -> Option<Direction> {
    match flow {
        f if f == eCapture => Some(Direction::Capture),
        f if f == eRender => Some(Direction::Render),
        _ => None,
    }
}

fn role_of(role: ERole) -> DeviceRole {
    match role {
        r if r == eConsole => DeviceRole::Console,
        r if r == eCommunications => DeviceRole::Communications,
        _ => DeviceRole::Multimedia,
    }
}

impl IMMNotificationClient_Impl for DeviceNotificationClient_Impl {
    fn OnDeviceStateChanged(&self, id: &PCWSTR, state: DEVICE_STATE) -> windows::core::Result<()> {
        if let Some(device_id) = read_device_id(id) {
            self.forward(DeviceEvent::DeviceStateChanged {
                device_id,
                new_state: DeviceState::from_raw(state.0),
            });
        }
        Ok(())
    }

    fn OnDeviceAdded(&self, id: &PCWSTR) -> windows::core::Result<()> {
        if let Some(device_id) = read_device_id(id) {
            self.forward(DeviceEvent::DeviceAdded { device_id });
        }
        Ok(())
    }

    fn OnDeviceRemoved(&self, id: &PCWSTR) -> windows::core::Result<()> {
        if let Some(device_id) = read_device_id(id) {
            self.forward(DeviceEvent::DeviceRemoved { device_id });
        }
        Ok(())
    }

    fn OnDefaultDeviceChanged(
        &self,
        flow: EDataFlow,
        role: ERole,
        default_id: &PCWSTR,
    ) -> windows::core::Result<()> {
        if let Some(direction) = direction_of(flow) {
            self.forward(DeviceEvent::DefaultDeviceChanged {
                direction,
                role: role_of(role),
                device_id: read_device_id(default_id),
            });
        }
        Ok(())
    }

    fn OnPropertyValueChanged(
        &self,
        _id: &PCWSTR,
        _key: &windows::Win32::UI::Shell::PropertiesSystem::PROPERTYKEY,
    ) -> windows::core::Result<()> {
        Ok(())
    }
}

/// A registered notification client. Unregisters on drop.
pub struct NotificationRegistration {
    enumerator: IMMDeviceEnumerator,
    client: IMMNotificationClient,
}

impl NotificationRegistration {
    /// Start forwarding device events to `sender` as [`Command::Device`].
    pub fn register(
        enumerator: &IMMDeviceEnumerator,
        sender: Sender<Command>,
    ) -> Result<Self, windows::core::Error> {
        unsafe {
            let client: IMMNotificationClient = DeviceNotificationClient { commands: sender }.into();
            enumerator.RegisterEndpointNotificationCallback(&client)?;
            Ok(Self {
                enumerator: enumerator.clone(),
                client,
            })
        }
    }
}

impl Drop for NotificationRegistration {
    fn drop(&mut self) {
        unsafe {
            let _ = self
                .enumerator
                .UnregisterEndpointNotificationCallback(&self.client);
        }
    }
}
