//! Command Dispatch
//!
//! Maps confirmed gaze codes to key presses aimed at one authorized
//! application, with duplicate suppression and a two-state display mode.

mod actions;
mod machine;
mod mode;

pub use actions::{ActionMap, KeyCommand, DEFAULT_ACTIONS_JSON};
pub use machine::{CommandStateMachine, DispatchOptions, DispatchOutcome, OutcomeKind};
pub use mode::DisplayMode;

use gaze::GazeCode;
use thiserror::Error;

/// Sentinel reported when the foreground application cannot be determined
pub const UNKNOWN_APP: &str = "unknown";

/// Action map errors (fatal at startup)
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to read action map {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Malformed action map: {0}")]
    Malformed(String),

    #[error("Unknown gaze code key '{0}' in action map")]
    UnknownCode(String),

    #[error("Missing action entry for gaze code {} ({0})", code_index(.0))]
    MissingEntry(GazeCode),

    #[error("Gaze code {} ({code}): {reason}", code_index(.code))]
    InvalidEntry { code: GazeCode, reason: String },

    #[error("Invalid dispatch option: {0}")]
    InvalidOption(String),
}

fn code_index(code: &GazeCode) -> u8 {
    code.index()
}

/// Key injection errors (best-effort, never fatal)
#[derive(Debug, Clone, Error)]
pub enum KeyError {
    #[error("Key injection not supported on this platform")]
    Unsupported,

    #[error("Unknown key token '{0}'")]
    UnknownKey(String),

    #[error("Key injection failed: {0}")]
    Injection(String),
}

/// Foreground-application collaborator
pub trait ForegroundApp: Send {
    /// Identifier of the focused application, or [`UNKNOWN_APP`] on failure
    fn current_foreground_app(&self) -> String;

    /// Bring an application to the front; best-effort
    fn focus(&self, _app: &str) -> bool {
        false
    }
}

/// Key-injection collaborator
pub trait KeySender: Send {
    /// Press `key` (a chord such as `ctrl+\`) `repeat` times
    fn send_key(&mut self, key: &str, repeat: u32) -> Result<(), KeyError>;

    /// Whether `key` can be delivered by this sender; checked once at startup
    fn check_key(&self, _key: &str) -> Result<(), KeyError> {
        Ok(())
    }
}
