//! Temporal debouncer: full-window super-majority voting

use ring_buffer::RingBuffer;
use tracing::debug;

use crate::{GazeCode, GazeConfig, GazeError};

/// Accumulates raw codes and confirms a code once a full window agrees on it
///
/// The window is evaluated only at capacity and is always drained afterwards,
/// so agreement never carries across window boundaries.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: RingBuffer<GazeCode>,
    required: usize,
    confirmed: Option<GazeCode>,
    evaluations: u64,
}

impl Debouncer {
    pub fn new(config: &GazeConfig) -> Result<Self, GazeError> {
        config.validate()?;
        let window = RingBuffer::new(config.window_size)
            .map_err(|e| GazeError::Config(e.to_string()))?;
        Ok(Self {
            window,
            required: config.required_agreement(),
            confirmed: None,
            evaluations: 0,
        })
    }

    /// Feed one raw code; returns a newly confirmed code, if any
    pub fn push(&mut self, code: GazeCode) -> Option<GazeCode> {
        self.window.push(code);
        if !self.window.is_full() {
            return None;
        }

        let verdict = self.majority();
        self.window.clear();
        self.evaluations += 1;

        match verdict {
            Some((mode, count)) if count >= self.required && Some(mode) != self.confirmed => {
                debug!("Confirmed {} ({}/{})", mode, count, self.window.capacity());
                self.confirmed = Some(mode);
                Some(mode)
            }
            Some((mode, count)) => {
                debug!("Window settled on {} ({}/{}), no change", mode, count, self.window.capacity());
                None
            }
            None => {
                debug!("Window tied, no confirmation");
                None
            }
        }
    }

    /// Most frequent code in the window; `None` when the top count is shared
    fn majority(&self) -> Option<(GazeCode, usize)> {
        let mut counts = [0usize; GazeCode::ALL.len()];
        for code in &self.window {
            counts[code.index() as usize] += 1;
        }

        let top = counts.iter().copied().max().unwrap_or(0);
        let mut leaders = GazeCode::ALL
            .into_iter()
            .filter(|code| counts[code.index() as usize] == top);

        match (leaders.next(), leaders.next()) {
            (Some(code), None) if top > 0 => Some((code, top)),
            _ => None,
        }
    }

    /// Current confirmed gaze state
    pub fn confirmed(&self) -> Option<GazeCode> {
        self.confirmed
    }

    /// Codes gathered toward the next evaluation
    pub fn pending(&self) -> usize {
        self.window.len()
    }

    pub fn window_size(&self) -> usize {
        self.window.capacity()
    }

    pub fn required_agreement(&self) -> usize {
        self.required
    }

    /// Number of full-window evaluations so far
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Forget the window and the confirmed state
    pub fn reset(&mut self) {
        self.window.clear();
        self.confirmed = None;
    }
}
