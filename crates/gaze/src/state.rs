//! Gaze codes

use serde::{Deserialize, Serialize};

/// Per-frame gaze reading, also the unit of confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GazeCode {
    Right,
    Left,
    Center,
    /// Left eye pair visible, right eye pair gone
    LeftClose,
    /// Right eye pair visible, left eye pair gone
    RightClose,
    /// Neither eye pair visible
    BothClose,
}

impl GazeCode {
    pub const ALL: [GazeCode; 6] = [
        GazeCode::Right,
        GazeCode::Left,
        GazeCode::Center,
        GazeCode::LeftClose,
        GazeCode::RightClose,
        GazeCode::BothClose,
    ];

    /// Integer code used by action-map files
    pub fn index(&self) -> u8 {
        match self {
            GazeCode::Right => 0,
            GazeCode::Left => 1,
            GazeCode::Center => 2,
            GazeCode::LeftClose => 3,
            GazeCode::RightClose => 4,
            GazeCode::BothClose => 5,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.index() == index)
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            GazeCode::Right => "Right",
            GazeCode::Left => "Left",
            GazeCode::Center => "Center",
            GazeCode::LeftClose => "Left Close",
            GazeCode::RightClose => "Right Close",
            GazeCode::BothClose => "Both Close",
        }
    }

    pub fn is_closure(&self) -> bool {
        matches!(
            self,
            GazeCode::LeftClose | GazeCode::RightClose | GazeCode::BothClose
        )
    }
}

impl std::fmt::Display for GazeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for code in GazeCode::ALL {
            assert_eq!(GazeCode::from_index(code.index()), Some(code));
        }
        assert_eq!(GazeCode::from_index(6), None);
    }

    #[test]
    fn test_closure_codes() {
        assert!(GazeCode::BothClose.is_closure());
        assert!(!GazeCode::Center.is_closure());
        assert_eq!(GazeCode::RightClose.to_string(), "Right Close");
    }
}
