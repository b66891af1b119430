//! Win32 key driver: focuses the editor window and injects scan codes with SendInput.

use anyhow::{bail, Context, Result};
use std::mem;
use windows::core::{HSTRING, PCWSTR};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP,
    KEYEVENTF_SCANCODE, VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::{
    FindWindowW, GetForegroundWindow, SetForegroundWindow,
};

use super::KeyDriver;

#[derive(Debug, Default)]
pub struct SendInputDriver {
    window: Option<HWND>,
}

impl SendInputDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the focused window back to the front if something took it.
    fn refocus(&self) {
        let Some(hwnd) = self.window else { return };
        // SAFETY: neither call dereferences memory owned by this process.
        unsafe {
            if GetForegroundWindow() != hwnd && !SetForegroundWindow(hwnd).as_bool() {
                tracing::warn!("Editor window lost focus and could not be restored");
            }
        }
    }

    fn send(&self, scan_code: u16, flags: KEYBD_EVENT_FLAGS) -> Result<()> {
        let input = [INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(0),
                    wScan: scan_code,
                    dwFlags: KEYEVENTF_SCANCODE | flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        }];
        // SAFETY: `input` is a fully initialised keyboard INPUT and the size matches its type.
        let sent = unsafe { SendInput(&input, mem::size_of::<INPUT>() as i32) };
        if sent != 1 {
            bail!("SendInput rejected scan code {:#04x}", scan_code);
        }
        Ok(())
    }
}

impl KeyDriver for SendInputDriver {
    fn focus(&mut self, window_title: &str) -> Result<()> {
        let title = HSTRING::from(window_title);
        // SAFETY: both arguments are valid for the duration of the call.
        let hwnd = unsafe { FindWindowW(PCWSTR::null(), &title) }
            .with_context(|| format!("Could not find window '{}'", window_title))?;
        // SAFETY: `hwnd` was just returned by FindWindowW.
        let focused = unsafe { SetForegroundWindow(hwnd) };
        if !focused.as_bool() {
            tracing::warn!("SetForegroundWindow refused focus for '{}'", window_title);
        }
        self.window = Some(hwnd);
        Ok(())
    }

    fn key_down(&mut self, scan_code: u16) -> Result<()> {
        self.refocus();
        self.send(scan_code, KEYBD_EVENT_FLAGS(0))
    }

    fn key_up(&mut self, scan_code: u16) -> Result<()> {
        self.send(scan_code, KEYEVENTF_KEYUP)
    }
}
