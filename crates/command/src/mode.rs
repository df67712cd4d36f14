//! Display mode

use serde::{Deserialize, Serialize};

/// Which of the two key mappings is active for directional gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Whole page fits the window; gestures flip pages
    #[default]
    FitPage,
    /// Page width fits the window; gestures scroll
    FitWidth,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 2] = [DisplayMode::FitPage, DisplayMode::FitWidth];

    /// Position in an action-map entry (`[page, scroll]`)
    pub fn index(&self) -> usize {
        match self {
            DisplayMode::FitPage => 0,
            DisplayMode::FitWidth => 1,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            DisplayMode::FitPage => DisplayMode::FitWidth,
            DisplayMode::FitWidth => DisplayMode::FitPage,
        }
    }

    /// Overlay label
    pub fn label(&self) -> &'static str {
        match self {
            DisplayMode::FitPage => "PAGE",
            DisplayMode::FitWidth => "SCROLL",
        }
    }
}
