//! Frame detection set types

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::mask::EyeMask;

/// Eye side, as seen in the mirrored frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Segmentation model classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassId {
    LeftIris,
    RightIris,
    LeftEyelid,
    RightEyelid,
}

impl ClassId {
    pub const ALL: [ClassId; 4] = [
        ClassId::LeftIris,
        ClassId::RightIris,
        ClassId::LeftEyelid,
        ClassId::RightEyelid,
    ];

    /// Map a model output index; unknown indices yield `None`
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(ClassId::LeftIris),
            1 => Some(ClassId::RightIris),
            2 => Some(ClassId::LeftEyelid),
            3 => Some(ClassId::RightEyelid),
            _ => None,
        }
    }

    pub fn index(&self) -> u32 {
        match self {
            ClassId::LeftIris => 0,
            ClassId::RightIris => 1,
            ClassId::LeftEyelid => 2,
            ClassId::RightEyelid => 3,
        }
    }

    pub fn side(&self) -> Side {
        match self {
            ClassId::LeftIris | ClassId::LeftEyelid => Side::Left,
            ClassId::RightIris | ClassId::RightEyelid => Side::Right,
        }
    }

    /// Same structure on the other side
    pub fn mirrored(&self) -> Self {
        match self {
            ClassId::LeftIris | ClassId::RightIris => ClassId::iris(self.side().opposite()),
            ClassId::LeftEyelid | ClassId::RightEyelid => ClassId::eyelid(self.side().opposite()),
        }
    }

    pub fn iris(side: Side) -> Self {
        match side {
            Side::Left => ClassId::LeftIris,
            Side::Right => ClassId::RightIris,
        }
    }

    pub fn eyelid(side: Side) -> Self {
        match side {
            Side::Left => ClassId::LeftEyelid,
            Side::Right => ClassId::RightEyelid,
        }
    }
}

/// One class-labeled mask
#[derive(Debug, Clone)]
pub struct Detection {
    pub class: ClassId,
    pub mask: EyeMask,
}

/// Unordered set of detections for a single frame
///
/// When a class appears more than once, the last mask wins.
#[derive(Debug, Clone, Default)]
pub struct FrameDetections {
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Frame sequence number
    pub sequence: u64,
    detections: Vec<Detection>,
}

impl FrameDetections {
    /// Create an empty detection set for a frame
    pub fn new(width: u32, height: u32, sequence: u64) -> Self {
        Self {
            width,
            height,
            sequence,
            detections: Vec::new(),
        }
    }

    /// Build from raw `(class index, mask)` pairs, skipping unknown classes
    pub fn from_indexed(
        width: u32,
        height: u32,
        sequence: u64,
        pairs: impl IntoIterator<Item = (u32, EyeMask)>,
    ) -> Self {
        let mut frame = Self::new(width, height, sequence);
        for (index, mask) in pairs {
            match ClassId::from_index(index) {
                Some(class) => frame.push(class, mask),
                None => debug!("Ignoring unknown class index {} in frame {}", index, sequence),
            }
        }
        frame
    }

    /// Add a detection
    pub fn push(&mut self, class: ClassId, mask: EyeMask) {
        self.detections.push(Detection { class, mask });
    }

    /// Builder-style [`push`](Self::push)
    pub fn with(mut self, class: ClassId, mask: EyeMask) -> Self {
        self.push(class, mask);
        self
    }

    /// Mask for a class (last one wins)
    pub fn mask(&self, class: ClassId) -> Option<&EyeMask> {
        self.detections
            .iter()
            .rev()
            .find(|d| d.class == class)
            .map(|d| &d.mask)
    }

    pub fn has(&self, class: ClassId) -> bool {
        self.detections.iter().any(|d| d.class == class)
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter()
    }

    /// The detections the model would report for the horizontally flipped frame
    ///
    /// Sides are assigned by image position, so masks flip and left/right
    /// labels swap. Use this for recordings captured without the selfie flip.
    pub fn mirrored(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            sequence: self.sequence,
            detections: self
                .detections
                .iter()
                .map(|d| Detection {
                    class: d.class.mirrored(),
                    mask: d.mask.mirrored(),
                })
                .collect(),
        }
    }
}
