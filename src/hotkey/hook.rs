//! Low-level keyboard hook for Windows.
//!
//! The hook procedure runs on the thread that installed the hook, inside
//! its message loop, and must return quickly. It only feeds the matcher and
//! enqueues a toggle; the toggle itself runs on the coordinator worker.

use std::cell::RefCell;
use std::sync::mpsc::Sender;

use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT,
    WH_KEYBOARD_LL, WM_KEYDOWN, WM_SYSKEYDOWN,
};

use super::matcher::{Hotkey, KeystrokeMatcher};
use crate::coordinator::Command;

struct HookContext {
    hook: HHOOK,
    matcher: KeystrokeMatcher,
    commands: Sender<Command>,
}

thread_local! {
    static HOOK_CONTEXT: RefCell<Option<HookContext>> = const { RefCell::new(None) };
}

/// An installed `WH_KEYBOARD_LL` hook. Uninstalls on drop.
///
/// Must be dropped on the thread that installed it.
pub struct KeyboardHook {
    hook: HHOOK,
}

impl KeyboardHook {
    /// Install the hook on the current thread. Matches of `hotkey` are
    /// swallowed and sent to `commands` as [`Command::ToggleMute`].
    pub fn install(hotkey: Hotkey, commands: Sender<Command>) -> windows::core::Result<Self> {
        let hook = unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), None, 0)? };

        HOOK_CONTEXT.with(|context| {
            *context.borrow_mut() = Some(HookContext {
                hook,
                matcher: KeystrokeMatcher::new(hotkey),
                commands,
            });
        });

        Ok(Self { hook })
    }
}

impl Drop for KeyboardHook {
    fn drop(&mut self) {
        unsafe {
            let _ = UnhookWindowsHookEx(self.hook);
        }
        HOOK_CONTEXT.with(|context| context.borrow_mut().take());
    }
}

extern "system" fn keyboard_hook_proc(ncode: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let is_key_down = matches!(wparam.0 as u32, WM_KEYDOWN | WM_SYSKEYDOWN);

    if ncode == HC_ACTION as i32 && is_key_down {
        // SAFETY: for WH_KEYBOARD_LL, lparam points to a KBDLLHOOKSTRUCT.
        let info = unsafe { &*(lparam.0 as *const KBDLLHOOKSTRUCT) };

        let handled = HOOK_CONTEXT.with(|context| {
            let mut context = context.borrow_mut();
            let Some(context) = context.as_mut() else {
                return false;
            };

            if !context.matcher.push(info.vkCode) {
                return false;
            }
            if context.commands.send(Command::ToggleMute).is_err() {
                tracing::warn!("Worker is gone; hotkey ignored");
            }
            true
        });

        if handled {
            return LRESULT(1);
        }
    }

    let hook = HOOK_CONTEXT.with(|context| {
        context
            .borrow()
            .as_ref()
            .map(|context| context.hook)
            .unwrap_or_default()
    });
    unsafe { CallNextHookEx(hook, ncode, wparam, lparam) }
}
