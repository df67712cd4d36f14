//! Gaze Tracking
//!
//! Turns noisy per-frame eye segmentation into a stable gaze event stream:
//! - Mask interpretation (iris offset against eyelid, eye closure)
//! - Temporal debouncing over a fixed window with super-majority voting

pub mod config;
pub mod debouncer;
pub mod interpreter;
pub mod state;

pub use config::{GazeConfig, GestureSet};
pub use debouncer::Debouncer;
pub use interpreter::{classify_dx, MaskInterpreter};
pub use state::GazeCode;

use frame_source::FrameDetections;
use thiserror::Error;

/// Gaze error types
#[derive(Error, Debug)]
pub enum GazeError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result of observing one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GazeObservation {
    /// Raw per-frame code (`None` when the frame carried no signal)
    pub raw: Option<GazeCode>,
    /// Newly confirmed code, if this frame completed a window that changed state
    pub confirmed: Option<GazeCode>,
}

/// Interpreter and debouncer chained per frame
pub struct GazeTracker {
    interpreter: MaskInterpreter,
    debouncer: Debouncer,
}

impl GazeTracker {
    /// Create a new tracker with configuration
    pub fn new(config: &GazeConfig) -> Result<Self, GazeError> {
        Ok(Self {
            interpreter: MaskInterpreter::new(config),
            debouncer: Debouncer::new(config)?,
        })
    }

    /// Interpret a frame and feed the debouncer; frames without signal are skipped
    pub fn observe(&mut self, frame: &FrameDetections) -> GazeObservation {
        let raw = self.interpreter.interpret(frame);
        let confirmed = raw.and_then(|code| self.debouncer.push(code));
        GazeObservation { raw, confirmed }
    }

    pub fn confirmed(&self) -> Option<GazeCode> {
        self.debouncer.confirmed()
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// Reset temporal state
    pub fn reset(&mut self) {
        self.debouncer.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_source::{ClassId, EyeMask};

    fn looking_right(sequence: u64) -> FrameDetections {
        FrameDetections::new(100, 50, sequence)
            .with(ClassId::RightIris, EyeMask::from_rects(100, 50, &[[70, 20, 1, 5]]))
            .with(ClassId::RightEyelid, EyeMask::from_rects(100, 50, &[[60, 20, 1, 5]]))
            .with(ClassId::LeftIris, EyeMask::from_rects(100, 50, &[[30, 20, 1, 5]]))
            .with(ClassId::LeftEyelid, EyeMask::from_rects(100, 50, &[[20, 20, 1, 5]]))
    }

    #[test]
    fn test_tracker_confirms_after_window() {
        let mut tracker = GazeTracker::new(&GazeConfig::responsive()).unwrap();

        for i in 0..9 {
            let obs = tracker.observe(&looking_right(i));
            assert_eq!(obs.raw, Some(GazeCode::Right));
            assert_eq!(obs.confirmed, None);
        }
        let obs = tracker.observe(&looking_right(9));
        assert_eq!(obs.confirmed, Some(GazeCode::Right));
        assert_eq!(tracker.confirmed(), Some(GazeCode::Right));
    }

    #[test]
    fn test_signal_free_frames_do_not_fill_window() {
        let config = GazeConfig {
            gesture_set: GestureSet::Directional,
            ..GazeConfig::responsive()
        };
        let mut tracker = GazeTracker::new(&config).unwrap();

        let obs = tracker.observe(&FrameDetections::new(100, 50, 0));
        assert_eq!(obs, GazeObservation::default());
        assert_eq!(tracker.debouncer().pending(), 0);
    }
}
