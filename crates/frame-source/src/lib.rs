//! Frame Detection Sources
//!
//! Types for the per-frame output of the eye segmentation model and the
//! producer-side trait that yields them:
//! - Class-labeled boolean masks (iris/eyelid, left/right)
//! - Mask centroids in pixel coordinates
//! - JSON-lines replay of recorded detections

pub mod frame;
pub mod mask;
pub mod replay;

pub use frame::{ClassId, Detection, FrameDetections, Side};
pub use mask::{Centroid, EyeMask};
pub use replay::ReplaySource;

use thiserror::Error;

/// Detection source error types
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Failed to open source: {0}")]
    Open(String),

    #[error("Read failed: {0}")]
    Read(#[from] std::io::Error),

    #[error("Malformed record on line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("Mask shape {got:?} does not match frame {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("Source already released")]
    Released,
}

/// Producer of per-frame detection sets (capture + inference collaborator)
///
/// `Ok(None)` signals end of stream.
pub trait DetectionSource: Send {
    /// Pull the next frame's detections
    fn next_frame(&mut self) -> Result<Option<FrameDetections>, FrameError>;

    /// Release the underlying capture resource
    fn release(&mut self);
}
