//! Mask interpreter: one frame's detections to one raw gaze code

use frame_source::{ClassId, FrameDetections, Side};
use tracing::trace;

use crate::{GazeCode, GazeConfig, GestureSet};

/// Classify a horizontal iris offset. Values exactly at the threshold are `Center`.
pub fn classify_dx(dx: f32, threshold: f32) -> GazeCode {
    if dx > threshold {
        GazeCode::Right
    } else if dx < -threshold {
        GazeCode::Left
    } else {
        GazeCode::Center
    }
}

/// Stateless per-frame interpreter
#[derive(Debug, Clone)]
pub struct MaskInterpreter {
    gesture_set: GestureSet,
    dx_threshold_px: f32,
}

impl MaskInterpreter {
    pub fn new(config: &GazeConfig) -> Self {
        Self {
            gesture_set: config.gesture_set,
            dx_threshold_px: config.dx_threshold_px,
        }
    }

    /// Derive the raw gaze code for a frame, or `None` when the frame carries no signal
    pub fn interpret(&self, frame: &FrameDetections) -> Option<GazeCode> {
        if self.gesture_set.tracks_closure() {
            if let Some(code) = self.closure(frame) {
                trace!("Frame {}: closure {}", frame.sequence, code);
                return Some(code);
            }
        }

        let mut offsets = Vec::with_capacity(2);
        for side in [Side::Right, Side::Left] {
            if !has_pair(frame, side) {
                continue;
            }
            // A present but empty mask leaves the centroid undefined
            offsets.push(horizontal_offset(frame, side)?);
        }

        if offsets.is_empty() {
            return None;
        }

        let dx = offsets.iter().map(|&dx| dx as f32).sum::<f32>() / offsets.len() as f32;
        let code = classify_dx(dx, self.dx_threshold_px);
        trace!("Frame {}: dx {:.1} -> {}", frame.sequence, dx, code);
        Some(code)
    }

    fn closure(&self, frame: &FrameDetections) -> Option<GazeCode> {
        let right_pair = has_pair(frame, Side::Right);
        let left_pair = has_pair(frame, Side::Left);
        let right_absent = is_absent(frame, Side::Right);
        let left_absent = is_absent(frame, Side::Left);

        if right_pair && left_absent {
            Some(GazeCode::RightClose)
        } else if left_pair && right_absent {
            Some(GazeCode::LeftClose)
        } else if right_absent && left_absent && self.gesture_set.tracks_both_closed() {
            Some(GazeCode::BothClose)
        } else {
            None
        }
    }
}

fn has_pair(frame: &FrameDetections, side: Side) -> bool {
    frame.has(ClassId::iris(side)) && frame.has(ClassId::eyelid(side))
}

fn is_absent(frame: &FrameDetections, side: Side) -> bool {
    !frame.has(ClassId::iris(side)) && !frame.has(ClassId::eyelid(side))
}

fn horizontal_offset(frame: &FrameDetections, side: Side) -> Option<i32> {
    let iris = frame.mask(ClassId::iris(side))?.centroid()?;
    let lid = frame.mask(ClassId::eyelid(side))?.centroid()?;
    Some(iris.x - lid.x)
}
