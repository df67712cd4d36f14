//! Display events

use command::{DispatchOutcome, DisplayMode};
use gaze::GazeCode;
use serde::{Deserialize, Serialize};

/// Horizontal placement bias for the overlay label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayHint {
    Left,
    Right,
    Centered,
}

impl OverlayHint {
    pub fn for_code(code: GazeCode) -> Self {
        match code {
            GazeCode::Left | GazeCode::LeftClose => OverlayHint::Left,
            GazeCode::Right | GazeCode::RightClose => OverlayHint::Right,
            GazeCode::Center | GazeCode::BothClose => OverlayHint::Centered,
        }
    }
}

/// One overlay instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEvent {
    pub code: GazeCode,
    /// Gesture label, e.g. `Right`
    pub gaze_label: String,
    /// Action label, e.g. `SCROLL DOWN`; absent when nothing was dispatched
    pub action_label: Option<String>,
    /// Display mode label after the gesture
    pub mode_label: String,
    pub hint: OverlayHint,
}

impl DisplayEvent {
    /// Event for a confirmation that produced no dispatch
    pub fn confirmed(code: GazeCode, mode: DisplayMode) -> Self {
        Self {
            code,
            gaze_label: code.label().to_string(),
            action_label: None,
            mode_label: mode.label().to_string(),
            hint: OverlayHint::for_code(code),
        }
    }

    /// Event describing a dispatch
    pub fn from_outcome(outcome: &DispatchOutcome) -> Self {
        Self {
            action_label: Some(outcome.label.clone()),
            ..Self::confirmed(outcome.code, outcome.mode)
        }
    }

    /// Primary overlay text
    pub fn headline(&self) -> String {
        match &self.action_label {
            Some(action) => format!("Gaze: {} / {}", self.gaze_label, action),
            None => format!("Gaze: {}", self.gaze_label),
        }
    }
}
