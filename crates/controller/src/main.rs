//! Gaze control binary
//!
//! Usage: `gaze-control [settings.toml]`

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use command::{ActionMap, ForegroundApp};
use controller::{init_logging, spawn_producer, ControllerSettings, GazePipeline};
use frame_source::ReplaySource;
use notifier::{run_overlay, LogOverlay, Notifier, OverlayAnchor};
use platform::StaticForeground;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings =
        ControllerSettings::load(settings_path.as_deref()).context("Failed to load settings")?;

    init_logging(settings.debug);
    info!("=== Gaze Control v{} ===", env!("CARGO_PKG_VERSION"));

    let gaze = settings.gaze_config();
    info!(
        "Gestures: {:?}, window {} frames, {} to confirm",
        gaze.gesture_set,
        gaze.window_size,
        gaze.required_agreement()
    );

    let actions = match &settings.actions_path {
        Some(path) => ActionMap::load(path, gaze.gesture_set),
        None => ActionMap::builtin(gaze.gesture_set),
    }
    .context("Failed to load action map")?;

    let replay = settings
        .replay_path
        .as_ref()
        .context("No detection source configured (set replay_path)")?;
    let source = ReplaySource::open(replay)
        .context("Failed to open detection source")?
        .mirrored(settings.mirror);

    let foreground: Box<dyn ForegroundApp> = match &settings.assume_foreground {
        Some(app) => Box::new(StaticForeground(app.clone())),
        None => platform::foreground_app(),
    };

    let (notifier, rx) = Notifier::channel();
    let overlay = tokio::spawn(run_overlay(
        rx,
        LogOverlay::new(OverlayAnchor::new(
            settings.screen_width,
            settings.screen_height,
        )),
    ));

    let pipeline = GazePipeline::new(
        &gaze,
        actions,
        settings.dispatch.clone(),
        foreground,
        platform::key_sender(settings.key_delivery),
        notifier,
    )?;
    let producer = spawn_producer(Box::new(source), pipeline);

    let mut poll = tokio::time::interval(Duration::from_millis(100));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted, shutting down");
                break;
            }
            _ = poll.tick() => {
                if producer.is_finished() {
                    break;
                }
            }
        }
    }

    let report = tokio::task::spawn_blocking(move || producer.stop()).await?;
    let overlay = overlay.await?;

    if let Some(error) = &report.error {
        anyhow::bail!("Capture loop failed: {}", error);
    }
    info!(
        "Done: {} frames, {} confirmed, {} dispatched, {} overlay events",
        report.stats.frames,
        report.stats.confirmations,
        report.stats.dispatches,
        overlay.shown()
    );
    Ok(())
}
