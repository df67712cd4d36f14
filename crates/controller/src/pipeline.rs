//! Per-frame gesture pipeline

use command::{ActionMap, CommandStateMachine, DispatchOptions, ForegroundApp, KeySender};
use frame_source::FrameDetections;
use gaze::{GazeConfig, GazeTracker};
use notifier::{DisplayEvent, Notifier};
use tracing::{debug, info, warn};

use crate::ControllerError;

/// Pipeline counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames: u64,
    /// Frames that yielded a raw gaze code
    pub signal_frames: u64,
    pub confirmations: u64,
    pub dispatches: u64,
}

/// interpret -> debounce -> dispatch -> notify, once per frame
pub struct GazePipeline {
    tracker: GazeTracker,
    machine: CommandStateMachine,
    foreground: Box<dyn ForegroundApp>,
    keys: Box<dyn KeySender>,
    notifier: Notifier,
    stats: PipelineStats,
}

impl GazePipeline {
    /// Build the pipeline, rejecting dispatch options and action-map keys
    /// that could only fail later, at dispatch time
    pub fn new(
        gaze: &GazeConfig,
        actions: ActionMap,
        options: DispatchOptions,
        foreground: Box<dyn ForegroundApp>,
        keys: Box<dyn KeySender>,
        notifier: Notifier,
    ) -> Result<Self, ControllerError> {
        options.validate()?;
        actions.check_keys(|key| keys.check_key(key))?;

        Ok(Self {
            tracker: GazeTracker::new(gaze)?,
            machine: CommandStateMachine::new(actions, options),
            foreground,
            keys,
            notifier,
            stats: PipelineStats::default(),
        })
    }

    /// Feed one frame; returns the display event if a gesture was confirmed
    pub fn process_frame(&mut self, frame: &FrameDetections) -> Option<DisplayEvent> {
        self.stats.frames += 1;

        let observation = self.tracker.observe(frame);
        if observation.raw.is_some() {
            self.stats.signal_frames += 1;
        }
        let code = observation.confirmed?;
        self.stats.confirmations += 1;
        info!("Gaze confirmed: {} (frame {})", code, frame.sequence);

        let app = self.foreground.current_foreground_app();
        let event = match self.machine.dispatch(code, &app, self.keys.as_mut()) {
            Some(outcome) => {
                self.stats.dispatches += 1;
                if outcome.refocus && !self.foreground.focus(self.machine.target_app()) {
                    debug!("Could not refocus '{}'", self.machine.target_app());
                }
                DisplayEvent::from_outcome(&outcome)
            }
            None => DisplayEvent::confirmed(code, self.machine.mode()),
        };

        if let Err(e) = self.notifier.notify(event.clone()) {
            warn!("Display event dropped: {}", e);
        }
        Some(event)
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn machine(&self) -> &CommandStateMachine {
        &self.machine
    }
}
