//! Platform Adapters
//!
//! One adapter pair per OS behind the [`ForegroundApp`] and [`KeySender`]
//! collaborator traits, selected once at startup:
//! - Windows: Win32 foreground window + `SendInput`
//! - macOS: System Events via `osascript`
//! - Elsewhere: foreground reported as unknown, keys logged only

pub mod keyspec;

mod fallback;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod win32;

pub use fallback::{DryRunKeys, StaticForeground, UnknownForeground};
pub use keyspec::{Chord, Key, KeyEvent, Modifier, Stroke};

use command::{ForegroundApp, KeySender};
use serde::{Deserialize, Serialize};
use tracing::info;

/// How keys are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyDelivery {
    /// Inject into the OS input stream
    #[default]
    Native,
    /// Log only
    DryRun,
}

/// Foreground-app adapter for the current OS
pub fn foreground_app() -> Box<dyn ForegroundApp> {
    #[cfg(target_os = "windows")]
    {
        info!("Using Win32 foreground lookup");
        Box::new(win32::Win32Foreground::new())
    }

    #[cfg(target_os = "macos")]
    {
        info!("Using System Events foreground lookup");
        Box::new(macos::SystemEventsForeground)
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        info!("No foreground lookup on this platform; dispatch stays disarmed");
        Box::new(UnknownForeground)
    }
}

/// Key-injection adapter for the current OS
pub fn key_sender(delivery: KeyDelivery) -> Box<dyn KeySender> {
    if delivery == KeyDelivery::DryRun {
        info!("Key delivery: dry run");
        return Box::new(DryRunKeys::default());
    }

    #[cfg(target_os = "windows")]
    {
        Box::new(win32::SendInputKeys)
    }

    #[cfg(target_os = "macos")]
    {
        Box::new(macos::SystemEventsKeys)
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        info!("No native key injection on this platform; falling back to dry run");
        Box::new(DryRunKeys::default())
    }
}
