//! Gaze configuration

use serde::{Deserialize, Serialize};

use crate::{GazeCode, GazeError};

/// Which gestures the interpreter may emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureSet {
    /// Right / Left / Center only
    Directional,
    /// Adds single-eye closures
    Blink,
    /// Adds both-eyes closure
    #[default]
    Full,
}

impl GestureSet {
    /// Codes the interpreter can produce under this set
    pub fn reachable_codes(&self) -> &'static [GazeCode] {
        match self {
            GestureSet::Directional => &[GazeCode::Right, GazeCode::Left, GazeCode::Center],
            GestureSet::Blink => &[
                GazeCode::Right,
                GazeCode::Left,
                GazeCode::Center,
                GazeCode::LeftClose,
                GazeCode::RightClose,
            ],
            GestureSet::Full => &GazeCode::ALL,
        }
    }

    pub fn tracks_closure(&self) -> bool {
        !matches!(self, GestureSet::Directional)
    }

    pub fn tracks_both_closed(&self) -> bool {
        matches!(self, GestureSet::Full)
    }
}

/// Interpreter and debouncer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeConfig {
    /// Active gesture set
    pub gesture_set: GestureSet,

    /// Iris-to-eyelid horizontal offset beyond which gaze is directional (pixels)
    pub dx_threshold_px: f32,

    /// Frames per confirmation window
    pub window_size: usize,

    /// Fraction of the window that must agree on one code
    pub agreement_ratio: f64,
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            gesture_set: GestureSet::Full,
            dx_threshold_px: 5.0,
            window_size: 30,      // 3s @ 10fps
            agreement_ratio: 0.9,
        }
    }
}

impl GazeConfig {
    /// Short window, looser agreement
    pub fn responsive() -> Self {
        Self {
            window_size: 10,
            agreement_ratio: 0.8,
            dx_threshold_px: 4.0,
            ..Default::default()
        }
    }

    /// Derive the window size from a frame rate and window duration
    pub fn with_rate(mut self, fps: f64, window_secs: f64) -> Self {
        self.window_size = (fps * window_secs).round().max(0.0) as usize;
        self
    }

    /// Minimum count of one code needed to confirm a full window
    pub fn required_agreement(&self) -> usize {
        // Epsilon keeps e.g. 10 * 0.7 = 7.000000000000001 from rounding up to 8
        ((self.window_size as f64 * self.agreement_ratio) - 1e-9).ceil() as usize
    }

    /// Reject configurations the debouncer cannot honor
    pub fn validate(&self) -> Result<(), GazeError> {
        if self.window_size == 0 {
            return Err(GazeError::Config("window_size must be at least 1".into()));
        }
        if !(self.agreement_ratio > 0.5 && self.agreement_ratio <= 1.0) {
            return Err(GazeError::Config(format!(
                "agreement_ratio {} must be in (0.5, 1.0]",
                self.agreement_ratio
            )));
        }
        if !self.dx_threshold_px.is_finite() || self.dx_threshold_px < 0.0 {
            return Err(GazeError::Config(format!(
                "dx_threshold_px {} must be a non-negative number",
                self.dx_threshold_px
            )));
        }
        Ok(())
    }
}
