//! Gaze controller
//!
//! Wires a detection source through the interpreter, debouncer and command
//! state machine, and hands display events to the overlay task.

pub mod logging;
pub mod pipeline;
pub mod producer;
pub mod settings;

pub use logging::init_logging;
pub use pipeline::{GazePipeline, PipelineStats};
pub use producer::{spawn_producer, ProducerHandle, ProducerReport};
pub use settings::ControllerSettings;

use thiserror::Error;

/// Controller error types
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Gaze error: {0}")]
    Gaze(#[from] gaze::GazeError),

    #[error("Action map error: {0}")]
    Command(#[from] command::CommandError),

    #[error("Detection source error: {0}")]
    Frame(#[from] frame_source::FrameError),
}
