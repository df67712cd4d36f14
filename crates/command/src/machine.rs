//! Mode/command state machine

use gaze::GazeCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{ActionMap, CommandError, DisplayMode, KeyCommand, KeySender};

/// Dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchOptions {
    /// Only this application (case-insensitive) receives keys
    pub target_app: String,
    /// Gesture that flips the display mode
    pub toggle_code: Option<GazeCode>,
    /// Whether the toggle gesture also sends its mapped key
    pub toggle_sends_key: bool,
    /// Ask for the target window to be refocused on Center
    pub refocus_on_center: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            target_app: "msedge.exe".to_string(),
            toggle_code: Some(GazeCode::BothClose),
            toggle_sends_key: true,
            refocus_on_center: false,
        }
    }
}

impl DispatchOptions {
    /// Reject option combinations the state machine cannot honor
    pub fn validate(&self) -> Result<(), CommandError> {
        if self.target_app.trim().is_empty() {
            return Err(CommandError::InvalidOption("target_app is empty".into()));
        }
        if self.toggle_code == Some(GazeCode::Center) {
            return Err(CommandError::InvalidOption(
                "toggle_code cannot be Center, which only re-arms dispatch".into(),
            ));
        }
        Ok(())
    }
}

/// What a dispatch did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// A key command was issued
    KeySent,
    /// Center re-armed duplicate suppression
    Rearmed,
    /// Display mode flipped (a key may also have been sent)
    ModeToggled,
    /// Mapped to nothing in the current mode
    NoAction,
}

/// Result of a dispatch, for the notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub code: GazeCode,
    pub kind: OutcomeKind,
    /// Key command issued, if any
    pub key: Option<KeyCommand>,
    /// False when the key sender reported a failure
    pub key_delivered: bool,
    /// Action label for the overlay
    pub label: String,
    /// Display mode after the dispatch
    pub mode: DisplayMode,
    /// Caller should refocus the target application
    pub refocus: bool,
}

/// Owns display mode and last-dispatched state for one controller session
pub struct CommandStateMachine {
    actions: ActionMap,
    options: DispatchOptions,
    mode: DisplayMode,
    last_dispatched: Option<GazeCode>,
    keys_sent: u64,
}

impl CommandStateMachine {
    pub fn new(actions: ActionMap, options: DispatchOptions) -> Self {
        info!(
            "Dispatching to '{}' (toggle: {:?})",
            options.target_app, options.toggle_code
        );
        Self {
            actions,
            options,
            mode: DisplayMode::default(),
            last_dispatched: None,
            keys_sent: 0,
        }
    }

    /// Handle one confirmed gaze code
    ///
    /// State is updated before the key is sent; a failed send does not roll
    /// back the mode or the last-dispatched code.
    pub fn dispatch(
        &mut self,
        code: GazeCode,
        foreground_app: &str,
        keys: &mut dyn KeySender,
    ) -> Option<DispatchOutcome> {
        if !self.is_authorized(foreground_app) {
            debug!(
                "Ignoring {}: foreground '{}' is not '{}'",
                code, foreground_app, self.options.target_app
            );
            self.last_dispatched = None;
            return None;
        }

        if code == GazeCode::Center {
            self.last_dispatched = None;
            return Some(DispatchOutcome {
                code,
                kind: OutcomeKind::Rearmed,
                key: None,
                key_delivered: true,
                label: code.label().to_uppercase(),
                mode: self.mode,
                refocus: self.options.refocus_on_center,
            });
        }

        if self.last_dispatched == Some(code) {
            debug!("Suppressing duplicate {}", code);
            return None;
        }
        self.last_dispatched = Some(code);

        let (kind, key, label) = if self.options.toggle_code == Some(code) {
            let key = if self.options.toggle_sends_key {
                self.actions.lookup(code, self.mode).cloned()
            } else {
                None
            };
            self.mode = self.mode.toggled();
            info!("Display mode -> {:?}", self.mode);
            let label = key
                .as_ref()
                .map(|k| k.label.clone())
                .unwrap_or_else(|| format!("{} MODE", self.mode.label()));
            (OutcomeKind::ModeToggled, key, label)
        } else {
            match self.actions.lookup(code, self.mode).cloned() {
                Some(key) => {
                    let label = key.label.clone();
                    (OutcomeKind::KeySent, Some(key), label)
                }
                None => (OutcomeKind::NoAction, None, code.label().to_uppercase()),
            }
        };

        let key_delivered = match &key {
            Some(command) => self.send(keys, command),
            None => true,
        };

        Some(DispatchOutcome {
            code,
            kind,
            key,
            key_delivered,
            label,
            mode: self.mode,
            refocus: false,
        })
    }

    fn send(&mut self, keys: &mut dyn KeySender, command: &KeyCommand) -> bool {
        info!("Sending '{}' x{}", command.key, command.repeat);
        match keys.send_key(&command.key, command.repeat) {
            Ok(()) => {
                self.keys_sent += 1;
                true
            }
            Err(e) => {
                warn!("Key '{}' not delivered: {}", command.key, e);
                false
            }
        }
    }

    fn is_authorized(&self, foreground_app: &str) -> bool {
        foreground_app.to_lowercase() == self.options.target_app.to_lowercase()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn last_dispatched(&self) -> Option<GazeCode> {
        self.last_dispatched
    }

    pub fn target_app(&self) -> &str {
        &self.options.target_app
    }

    /// Successful key dispatches so far
    pub fn keys_sent(&self) -> u64 {
        self.keys_sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyError;
    use gaze::GestureSet;

    #[derive(Default)]
    struct RecordingKeys {
        sent: Vec<(String, u32)>,
        fail: bool,
    }

    impl KeySender for RecordingKeys {
        fn send_key(&mut self, key: &str, repeat: u32) -> Result<(), KeyError> {
            if self.fail {
                return Err(KeyError::Injection("stub failure".into()));
            }
            self.sent.push((key.to_string(), repeat));
            Ok(())
        }
    }

    const TARGET: &str = "AcroRd32.exe";

    fn machine() -> CommandStateMachine {
        CommandStateMachine::new(
            ActionMap::builtin(GestureSet::Full).unwrap(),
            DispatchOptions {
                target_app: TARGET.to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_authorized_dispatch_sends_key() {
        let mut m = machine();
        let mut keys = RecordingKeys::default();

        let outcome = m.dispatch(GazeCode::Right, "acrord32.EXE", &mut keys).unwrap();
        assert_eq!(outcome.kind, OutcomeKind::KeySent);
        assert_eq!(outcome.label, "NEXT PAGE");
        assert_eq!(outcome.mode, DisplayMode::FitPage);
        assert_eq!(keys.sent, vec![("pagedown".to_string(), 1)]);
        assert_eq!(m.keys_sent(), 1);
    }

    #[test]
    fn test_unauthorized_app_sends_nothing() {
        let mut m = machine();
        let mut keys = RecordingKeys::default();

        assert!(m.dispatch(GazeCode::Right, "notepad.exe", &mut keys).is_none());
        assert!(m.dispatch(GazeCode::Right, "notepad.exe", &mut keys).is_none());
        assert!(m.dispatch(GazeCode::Left, crate::UNKNOWN_APP, &mut keys).is_none());
        assert!(keys.sent.is_empty());
        assert_eq!(m.last_dispatched(), None);
    }

    #[test]
    fn test_guard_failure_resets_last_dispatched() {
        let mut m = machine();
        let mut keys = RecordingKeys::default();

        m.dispatch(GazeCode::Right, TARGET, &mut keys);
        m.dispatch(GazeCode::Left, "explorer.exe", &mut keys);
        m.dispatch(GazeCode::Right, TARGET, &mut keys);
        assert_eq!(keys.sent.len(), 2);
    }

    #[test]
    fn test_duplicate_suppressed() {
        let mut m = machine();
        let mut keys = RecordingKeys::default();

        assert!(m.dispatch(GazeCode::Left, TARGET, &mut keys).is_some());
        assert!(m.dispatch(GazeCode::Left, TARGET, &mut keys).is_none());
        assert_eq!(keys.sent.len(), 1);
    }

    #[test]
    fn test_center_rearms() {
        let mut m = machine();
        let mut keys = RecordingKeys::default();

        m.dispatch(GazeCode::Right, TARGET, &mut keys);
        let center = m.dispatch(GazeCode::Center, TARGET, &mut keys).unwrap();
        assert_eq!(center.kind, OutcomeKind::Rearmed);
        assert!(center.key.is_none());
        assert_eq!(m.last_dispatched(), None);

        m.dispatch(GazeCode::Right, TARGET, &mut keys);
        assert_eq!(keys.sent.len(), 2);
    }

    #[test]
    fn test_toggle_switches_mapping() {
        let mut m = machine();
        let mut keys = RecordingKeys::default();

        let toggle = m.dispatch(GazeCode::BothClose, TARGET, &mut keys).unwrap();
        assert_eq!(toggle.kind, OutcomeKind::ModeToggled);
        assert_eq!(toggle.mode, DisplayMode::FitWidth);
        assert_eq!(toggle.label, "FIT WIDTH");

        let scroll = m.dispatch(GazeCode::Right, TARGET, &mut keys).unwrap();
        assert_eq!(scroll.label, "SCROLL DOWN");
        assert_eq!(
            keys.sent,
            vec![("ctrl+\\".to_string(), 1), ("down".to_string(), 5)]
        );
    }

    #[test]
    fn test_toggle_without_key() {
        let mut m = CommandStateMachine::new(
            ActionMap::builtin(GestureSet::Full).unwrap(),
            DispatchOptions {
                target_app: TARGET.to_string(),
                toggle_sends_key: false,
                ..Default::default()
            },
        );
        let mut keys = RecordingKeys::default();

        let outcome = m.dispatch(GazeCode::BothClose, TARGET, &mut keys).unwrap();
        assert!(outcome.key.is_none());
        assert_eq!(outcome.label, "SCROLL MODE");
        assert!(keys.sent.is_empty());
        assert_eq!(m.mode(), DisplayMode::FitWidth);
    }

    #[test]
    fn test_failed_send_keeps_state() {
        let mut m = machine();
        let mut keys = RecordingKeys {
            fail: true,
            ..Default::default()
        };

        let outcome = m.dispatch(GazeCode::BothClose, TARGET, &mut keys).unwrap();
        assert!(!outcome.key_delivered);
        assert_eq!(m.mode(), DisplayMode::FitWidth);
        assert_eq!(m.last_dispatched(), Some(GazeCode::BothClose));
        assert_eq!(m.keys_sent(), 0);
    }

    #[test]
    fn test_null_entry_is_no_action() {
        let json = r#"{"0": null, "1": [["pageup", 1], null], "2": null}"#;
        let mut m = CommandStateMachine::new(
            ActionMap::from_json(json, GestureSet::Directional).unwrap(),
            DispatchOptions {
                target_app: TARGET.to_string(),
                toggle_code: None,
                ..Default::default()
            },
        );
        let mut keys = RecordingKeys::default();

        let outcome = m.dispatch(GazeCode::Right, TARGET, &mut keys).unwrap();
        assert_eq!(outcome.kind, OutcomeKind::NoAction);
        assert_eq!(outcome.label, "RIGHT");
        assert!(keys.sent.is_empty());
    }

    #[test]
    fn test_options_validation() {
        assert!(DispatchOptions::default().validate().is_ok());

        let center_toggle = DispatchOptions {
            toggle_code: Some(GazeCode::Center),
            ..Default::default()
        };
        assert!(matches!(
            center_toggle.validate(),
            Err(CommandError::InvalidOption(_))
        ));

        let no_target = DispatchOptions {
            target_app: "  ".to_string(),
            ..Default::default()
        };
        assert!(no_target.validate().is_err());
    }
}
