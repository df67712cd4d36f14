//! Win32 adapters

use std::sync::Mutex;

use command::{ForegroundApp, KeyError, KeySender, UNKNOWN_APP};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::debug;
use windows::Win32::Foundation::{BOOL, HWND, LPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP,
    VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetForegroundWindow, GetWindow, GetWindowThreadProcessId, IsIconic,
    IsWindowVisible, SetForegroundWindow, ShowWindow, GW_OWNER, SW_RESTORE,
};

use crate::keyspec::{Chord, Key, KeyEvent, Modifier, Stroke};

/// Executable name of the process owning the foreground window
pub struct Win32Foreground {
    system: Mutex<System>,
}

impl Win32Foreground {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }

    fn foreground_pid() -> Option<u32> {
        let mut pid: u32 = 0;
        unsafe {
            let hwnd = GetForegroundWindow();
            if hwnd.0.is_null() {
                return None;
            }
            GetWindowThreadProcessId(hwnd, Some(&mut pid));
        }
        (pid != 0).then_some(pid)
    }

    fn process_names(&self, pids: &[u32]) -> Option<Vec<String>> {
        let mut system = self.system.lock().ok()?;
        let wanted: Vec<Pid> = pids.iter().map(|&pid| Pid::from_u32(pid)).collect();
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&wanted),
            true,
            ProcessRefreshKind::nothing(),
        );
        Some(
            wanted
                .iter()
                .map(|pid| {
                    system
                        .process(*pid)
                        .map(|p| p.name().to_string_lossy().into_owned())
                        .unwrap_or_default()
                })
                .collect(),
        )
    }

    /// First visible top-level window owned by a process named `app`
    fn find_window(&self, app: &str) -> Option<HWND> {
        let windows = top_level_windows();
        let pids: Vec<u32> = windows.iter().map(|(_, pid)| *pid).collect();
        let names = self.process_names(&pids)?;

        windows
            .into_iter()
            .zip(names)
            .find(|(_, name)| name.eq_ignore_ascii_case(app))
            .map(|((hwnd, _), _)| hwnd)
    }
}

impl Default for Win32Foreground {
    fn default() -> Self {
        Self::new()
    }
}

impl ForegroundApp for Win32Foreground {
    fn current_foreground_app(&self) -> String {
        let Some(pid) = Self::foreground_pid() else {
            return UNKNOWN_APP.to_string();
        };
        match self.process_names(&[pid]).and_then(|names| names.into_iter().next()) {
            Some(name) if !name.is_empty() => name,
            _ => {
                debug!("Foreground pid {} not found", pid);
                UNKNOWN_APP.to_string()
            }
        }
    }

    fn focus(&self, app: &str) -> bool {
        let Some(hwnd) = self.find_window(app) else {
            debug!("No visible window for '{}'", app);
            return false;
        };
        unsafe {
            if IsIconic(hwnd).as_bool() {
                let _ = ShowWindow(hwnd, SW_RESTORE);
            }
            SetForegroundWindow(hwnd).as_bool()
        }
    }
}

/// Visible, unowned top-level windows with their process ids
fn top_level_windows() -> Vec<(HWND, u32)> {
    unsafe extern "system" fn collect(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let out = &mut *(lparam.0 as *mut Vec<(HWND, u32)>);
        if IsWindowVisible(hwnd).as_bool()
            && GetWindow(hwnd, GW_OWNER).unwrap_or_default().0.is_null()
        {
            let mut pid: u32 = 0;
            GetWindowThreadProcessId(hwnd, Some(&mut pid));
            if pid != 0 {
                out.push((hwnd, pid));
            }
        }
        BOOL(1)
    }

    let mut found: Vec<(HWND, u32)> = Vec::new();
    unsafe {
        let ptr = &mut found as *mut Vec<(HWND, u32)>;
        let _ = EnumWindows(Some(collect), LPARAM(ptr as isize));
    }
    found
}

/// Key chords via `SendInput`
pub struct SendInputKeys;

impl KeySender for SendInputKeys {
    fn send_key(&mut self, key: &str, repeat: u32) -> Result<(), KeyError> {
        let chord = Chord::parse(key)?;
        let vk = key_vk(chord.key).ok_or_else(|| KeyError::UnknownKey(key.to_string()))?;

        for _ in 0..repeat {
            chord.press(|event| match event {
                KeyEvent::Down(stroke) => send_vk(stroke_vk(stroke, vk), KEYBD_EVENT_FLAGS(0)),
                KeyEvent::Up(stroke) => send_vk(stroke_vk(stroke, vk), KEYEVENTF_KEYUP),
            })?;
        }
        Ok(())
    }

    fn check_key(&self, key: &str) -> Result<(), KeyError> {
        let chord = Chord::parse(key)?;
        key_vk(chord.key)
            .map(|_| ())
            .ok_or_else(|| KeyError::UnknownKey(key.to_string()))
    }
}

fn stroke_vk(stroke: Stroke, key: VIRTUAL_KEY) -> VIRTUAL_KEY {
    match stroke {
        Stroke::Modifier(m) => modifier_vk(m),
        Stroke::Key(_) => key,
    }
}

fn send_vk(vk: VIRTUAL_KEY, flags: KEYBD_EVENT_FLAGS) -> Result<(), KeyError> {
    let input = INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
    if sent == 0 {
        return Err(KeyError::Injection("SendInput returned 0".into()));
    }
    Ok(())
}

fn modifier_vk(modifier: Modifier) -> VIRTUAL_KEY {
    match modifier {
        Modifier::Ctrl => VIRTUAL_KEY(0x11),  // VK_CONTROL
        Modifier::Shift => VIRTUAL_KEY(0x10), // VK_SHIFT
        Modifier::Alt => VIRTUAL_KEY(0x12),   // VK_MENU
        Modifier::Meta => VIRTUAL_KEY(0x5B),  // VK_LWIN
    }
}

fn key_vk(key: Key) -> Option<VIRTUAL_KEY> {
    let code: u16 = match key {
        Key::PageUp => 0x21,
        Key::PageDown => 0x22,
        Key::End => 0x23,
        Key::Home => 0x24,
        Key::Left => 0x25,
        Key::Up => 0x26,
        Key::Right => 0x27,
        Key::Down => 0x28,
        Key::Insert => 0x2D,
        Key::Delete => 0x2E,
        Key::Backspace => 0x08,
        Key::Tab => 0x09,
        Key::Enter => 0x0D,
        Key::Escape => 0x1B,
        Key::Space => 0x20,
        Key::Function(n) => 0x6F + n as u16, // VK_F1 = 0x70
        Key::Char(ch) if ch.is_ascii_alphabetic() => ch.to_ascii_uppercase() as u16,
        Key::Char(ch) if ch.is_ascii_digit() => ch as u16,
        Key::Char(ch) => match ch {
            ';' => 0xBA,
            '=' | '+' => 0xBB,
            ',' => 0xBC,
            '-' => 0xBD,
            '.' => 0xBE,
            '/' => 0xBF,
            '`' => 0xC0,
            '[' => 0xDB,
            '\\' => 0xDC,
            ']' => 0xDD,
            '\'' => 0xDE,
            _ => return None,
        },
    };
    Some(VIRTUAL_KEY(code))
}
