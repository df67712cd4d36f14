//! Fixed-Capacity Ring Buffer
//!
//! Provides the bounded, insertion-ordered sample window used by the gaze
//! debouncer. Oldest entries are evicted on overflow.

mod buffer;

pub use buffer::{Iter, RingBuffer};

use thiserror::Error;

/// Ring buffer construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingBufferError {
    #[error("Ring buffer capacity must be greater than zero")]
    ZeroCapacity,
}
