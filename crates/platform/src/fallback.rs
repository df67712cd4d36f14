//! Portable adapters

use command::{ForegroundApp, KeyError, KeySender, UNKNOWN_APP};
use tracing::info;

use crate::keyspec::Chord;

/// Foreground lookup that always fails safe
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownForeground;

impl ForegroundApp for UnknownForeground {
    fn current_foreground_app(&self) -> String {
        UNKNOWN_APP.to_string()
    }
}

/// Foreground lookup pinned to one application name
#[derive(Debug, Clone)]
pub struct StaticForeground(pub String);

impl ForegroundApp for StaticForeground {
    fn current_foreground_app(&self) -> String {
        self.0.clone()
    }

    fn focus(&self, app: &str) -> bool {
        app.eq_ignore_ascii_case(&self.0)
    }
}

/// Validates and logs key presses without injecting them
#[derive(Debug, Clone, Default)]
pub struct DryRunKeys {
    presses: u64,
}

impl DryRunKeys {
    /// Total simulated presses
    pub fn presses(&self) -> u64 {
        self.presses
    }
}

impl KeySender for DryRunKeys {
    fn send_key(&mut self, key: &str, repeat: u32) -> Result<(), KeyError> {
        let chord = Chord::parse(key)?;
        info!("[dry run] {:?} x{}", chord, repeat);
        self.presses += repeat as u64;
        Ok(())
    }

    fn check_key(&self, key: &str) -> Result<(), KeyError> {
        Chord::parse(key).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_foreground() {
        assert_eq!(UnknownForeground.current_foreground_app(), UNKNOWN_APP);
        assert!(!UnknownForeground.focus("msedge.exe"));
    }

    #[test]
    fn test_dry_run_counts_presses() {
        let mut keys = DryRunKeys::default();
        keys.send_key("down", 5).unwrap();
        keys.send_key("ctrl+\\", 1).unwrap();
        assert_eq!(keys.presses(), 6);

        assert!(keys.send_key("nonsense", 1).is_err());
        assert_eq!(keys.presses(), 6);
    }

    #[test]
    fn test_dry_run_checks_keys() {
        let keys = DryRunKeys::default();
        assert!(keys.check_key("ctrl+\\").is_ok());
        assert!(matches!(
            keys.check_key("scrolldown"),
            Err(KeyError::UnknownKey(k)) if k == "scrolldown"
        ));
        assert_eq!(keys.presses(), 0);
    }

    #[test]
    fn test_static_foreground_focus() {
        let fg = StaticForeground("AcroRd32.exe".to_string());
        assert_eq!(fg.current_foreground_app(), "AcroRd32.exe");
        assert!(fg.focus("acrord32.exe"));
        assert!(!fg.focus("msedge.exe"));
    }
}
