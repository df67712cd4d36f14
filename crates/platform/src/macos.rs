//! macOS adapters via System Events

use std::process::Command;

use command::{ForegroundApp, KeyError, KeySender, UNKNOWN_APP};
use tracing::debug;

use crate::keyspec::{Chord, Key, Modifier};

fn osascript(script: &str) -> Result<String, String> {
    let output = Command::new("osascript")
        .arg("-e")
        .arg(script)
        .output()
        .map_err(|e| e.to_string())?;
    if !output.status.success() {
        return Err(String::from_utf8_lossy(&output.stderr).trim().to_string());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Name of the frontmost application process
pub struct SystemEventsForeground;

impl ForegroundApp for SystemEventsForeground {
    fn current_foreground_app(&self) -> String {
        match osascript(
            "tell application \"System Events\" to get name of first application process whose frontmost is true",
        ) {
            Ok(name) if !name.is_empty() => name,
            Ok(_) => UNKNOWN_APP.to_string(),
            Err(e) => {
                debug!("Frontmost app lookup failed: {}", e);
                UNKNOWN_APP.to_string()
            }
        }
    }

    fn focus(&self, app: &str) -> bool {
        let script = format!("tell application \"{}\" to activate", escape(app));
        osascript(&script).is_ok()
    }
}

/// Keystrokes through System Events
pub struct SystemEventsKeys;

impl KeySender for SystemEventsKeys {
    fn send_key(&mut self, key: &str, repeat: u32) -> Result<(), KeyError> {
        let chord = Chord::parse(key)?;
        let script = script_for(&chord, repeat);
        osascript(&script).map_err(KeyError::Injection)?;
        Ok(())
    }

    fn check_key(&self, key: &str) -> Result<(), KeyError> {
        match Chord::parse(key)?.key {
            Key::Function(n) if n as usize > FUNCTION_KEY_CODES.len() => {
                Err(KeyError::UnknownKey(key.to_string()))
            }
            _ => Ok(()),
        }
    }
}

fn script_for(chord: &Chord, repeat: u32) -> String {
    let action = match chord.key {
        Key::Char(ch) => format!("keystroke \"{}\"", escape(&ch.to_string())),
        other => format!("key code {}", key_code(other)),
    };

    let modifiers: Vec<&str> = chord
        .modifiers
        .iter()
        .map(|m| match m {
            Modifier::Ctrl => "control down",
            Modifier::Shift => "shift down",
            Modifier::Alt => "option down",
            Modifier::Meta => "command down",
        })
        .collect();
    let using = if modifiers.is_empty() {
        String::new()
    } else {
        format!(" using {{{}}}", modifiers.join(", "))
    };

    format!(
        "tell application \"System Events\"\nrepeat {} times\n{}{}\nend repeat\nend tell",
        repeat, action, using
    )
}

fn key_code(key: Key) -> u16 {
    match key {
        Key::PageUp => 116,
        Key::PageDown => 121,
        Key::Home => 115,
        Key::End => 119,
        Key::Left => 123,
        Key::Right => 124,
        Key::Down => 125,
        Key::Up => 126,
        Key::Enter => 36,
        Key::Tab => 48,
        Key::Space => 49,
        Key::Backspace => 51,
        Key::Escape => 53,
        Key::Delete => 117,
        Key::Insert => 114, // Help
        Key::Function(n) => FUNCTION_KEY_CODES[(n as usize - 1).min(FUNCTION_KEY_CODES.len() - 1)],
        Key::Char(_) => 0,
    }
}

const FUNCTION_KEY_CODES: [u16; 20] = [
    122, 120, 99, 118, 96, 97, 98, 100, 101, 109, 103, 111, 105, 107, 113, 106, 64, 79, 80, 90,
];

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
