//! Event Notifier
//!
//! Turns confirmed gestures into display events and hands them, in order and
//! without blocking, to the overlay running on its own task.

mod event;
mod fade;
mod overlay;

pub use event::{DisplayEvent, OverlayHint};
pub use fade::{FadePhase, FadeTimeline};
pub use overlay::{run_overlay, LogOverlay, Overlay, OverlayAnchor};

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

/// Notifier error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Overlay receiver closed")]
    Closed,
}

/// Producer-side handle; cheap to clone, never blocks
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<DisplayEvent>,
}

impl Notifier {
    /// Create a notifier and the receiver the overlay task drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DisplayEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue an event for display
    pub fn notify(&self, event: DisplayEvent) -> Result<(), NotifyError> {
        debug!("Notify: {}", event.headline());
        self.tx.send(event).map_err(|_| NotifyError::Closed)
    }
}
