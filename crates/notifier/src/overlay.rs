//! Overlay collaborator and the task that feeds it

use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{DisplayEvent, FadeTimeline, OverlayHint};

/// Renders display events; owns its own positioning and fade policy
pub trait Overlay: Send {
    fn show(&mut self, event: &DisplayEvent, now: Instant);
}

/// Label placement on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayAnchor {
    pub screen_width: u32,
    pub screen_height: u32,
}

impl OverlayAnchor {
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            screen_width,
            screen_height,
        }
    }

    /// Top-left corner for a label: left-biased labels start at 10% of the
    /// width, right-biased ones end at 90%, all are vertically centered
    pub fn position(&self, hint: OverlayHint, label_width: u32, label_height: u32) -> (i32, i32) {
        let sw = self.screen_width as f64;
        let lw = label_width as i32;
        let x = match hint {
            OverlayHint::Left => (sw * 0.1) as i32,
            OverlayHint::Right => (sw * 0.9) as i32 - lw,
            OverlayHint::Centered => (self.screen_width as i32 - lw) / 2,
        };
        let y = (self.screen_height as i32 - label_height as i32) / 2;
        (x, y)
    }
}

/// Overlay that renders to the log
pub struct LogOverlay {
    anchor: OverlayAnchor,
    timeline: FadeTimeline,
    shown: u64,
}

impl LogOverlay {
    pub fn new(anchor: OverlayAnchor) -> Self {
        Self {
            anchor,
            timeline: FadeTimeline::default(),
            shown: 0,
        }
    }

    pub fn shown(&self) -> u64 {
        self.shown
    }

    pub fn timeline(&self) -> &FadeTimeline {
        &self.timeline
    }
}

impl Overlay for LogOverlay {
    fn show(&mut self, event: &DisplayEvent, now: Instant) {
        let text = event.headline();
        // Rough glyph metrics for a 36pt label
        let (w, h) = (text.chars().count() as u32 * 22, 48);
        let (x, y) = self.anchor.position(event.hint, w, h);

        self.timeline.restart(now);
        self.shown += 1;
        info!(
            "[overlay] {} [{} mode] at ({}, {}) for {:?}",
            text,
            event.mode_label,
            x,
            y,
            self.timeline.lifetime()
        );
    }
}

/// Drain display events into an overlay until every notifier is dropped
pub async fn run_overlay<O: Overlay>(
    mut rx: mpsc::UnboundedReceiver<DisplayEvent>,
    mut overlay: O,
) -> O {
    while let Some(event) = rx.recv().await {
        overlay.show(&event, Instant::now());
    }
    debug!("Overlay channel closed");
    overlay
}
