//! Capture thread
//!
//! Frames are pulled and processed on a dedicated thread so the async
//! runtime (overlay, signal handling) is never blocked by capture or key
//! injection. The source is released on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use frame_source::{DetectionSource, FrameError};
use tracing::{error, info, warn};

use crate::{GazePipeline, PipelineStats};

/// Consecutive read failures tolerated before the loop gives up
const MAX_CONSECUTIVE_ERRORS: u32 = 30;

/// Why the capture loop ended, and what it processed
#[derive(Debug, Clone, Default)]
pub struct ProducerReport {
    pub stats: PipelineStats,
    /// True when the source ran out of frames
    pub exhausted: bool,
    pub error: Option<String>,
}

/// Handle to the running capture thread
pub struct ProducerHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<ProducerReport>,
}

impl ProducerHandle {
    /// Whether the loop has already exited
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Signal the loop to stop and wait for it
    pub fn stop(self) -> ProducerReport {
        self.stop.store(true, Ordering::SeqCst);
        self.join()
    }

    /// Wait for the loop to exit on its own
    pub fn join(self) -> ProducerReport {
        self.thread.join().unwrap_or_else(|_| ProducerReport {
            error: Some("capture thread panicked".to_string()),
            ..Default::default()
        })
    }
}

/// Start pulling frames from `source` into `pipeline`
pub fn spawn_producer(
    mut source: Box<dyn DetectionSource>,
    mut pipeline: GazePipeline,
) -> ProducerHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();

    let thread = thread::spawn(move || {
        let mut report = ProducerReport::default();
        let mut consecutive_errors = 0u32;

        info!("Capture loop started");
        while !stop_flag.load(Ordering::SeqCst) {
            match source.next_frame() {
                Ok(Some(frame)) => {
                    consecutive_errors = 0;
                    pipeline.process_frame(&frame);
                }
                Ok(None) => {
                    info!("Detection source exhausted");
                    report.exhausted = true;
                    break;
                }
                Err(FrameError::Released) => {
                    report.error = Some(FrameError::Released.to_string());
                    break;
                }
                Err(e) => {
                    consecutive_errors += 1;
                    warn!("Skipping frame: {}", e);
                    if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                        error!("Giving up after {} consecutive read errors", consecutive_errors);
                        report.error = Some(e.to_string());
                        break;
                    }
                }
            }
        }

        source.release();
        report.stats = pipeline.stats();
        info!(
            "Capture loop stopped: {} frames, {} confirmations",
            report.stats.frames, report.stats.confirmations
        );
        report
    });

    ProducerHandle { stop, thread }
}
