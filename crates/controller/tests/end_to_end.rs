//! Replay-driven runs through the whole controller

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use command::{ActionMap, DispatchOptions, KeyError, KeySender};
use controller::{spawn_producer, GazePipeline};
use frame_source::ReplaySource;
use gaze::{GazeCode, GazeConfig, GestureSet};
use notifier::{run_overlay, DisplayEvent, Notifier, Overlay};
use platform::StaticForeground;

const TARGET: &str = "AcroRd32.exe";

const MAPPING: &str = r#"{
    "0": [["down", 5, "SCROLL DOWN"], null],
    "1": [["up", 5, "SCROLL UP"], null],
    "2": null
}"#;

#[derive(Clone, Default)]
struct RecordingKeys(Arc<Mutex<Vec<(String, u32)>>>);

impl KeySender for RecordingKeys {
    fn send_key(&mut self, key: &str, repeat: u32) -> Result<(), KeyError> {
        self.0.lock().unwrap().push((key.to_string(), repeat));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingOverlay(Vec<DisplayEvent>);

impl Overlay for RecordingOverlay {
    fn show(&mut self, event: &DisplayEvent, _now: Instant) {
        self.0.push(event.clone());
    }
}

/// One JSON line with both eyes looking `dx` pixels off center
fn line(dx: i32) -> String {
    let rect = |x: i32| format!("[[{}, 18, 5, 5]]", x);
    format!(
        "{{\"width\": 100, \"height\": 40, \"detections\": [\
         {{\"class\": 2, \"rects\": {}}}, {{\"class\": 3, \"rects\": {}}}, \
         {{\"class\": 0, \"rects\": {}}}, {{\"class\": 1, \"rects\": {}}}]}}\n",
        rect(28),
        rect(68),
        rect(28 + dx),
        rect(68 + dx)
    )
}

fn recording(dxs: &[i32]) -> ReplaySource {
    let text: String = dxs.iter().map(|&dx| line(dx)).collect();
    ReplaySource::from_reader(Cursor::new(text.into_bytes()))
}

async fn run(
    dxs: &[i32],
    foreground: &str,
) -> (Vec<(String, u32)>, Vec<DisplayEvent>) {
    let config = GazeConfig {
        gesture_set: GestureSet::Directional,
        window_size: 10,
        agreement_ratio: 0.8,
        ..Default::default()
    };
    let keys = RecordingKeys::default();
    let (notifier, rx) = Notifier::channel();
    let overlay = tokio::spawn(run_overlay(rx, RecordingOverlay::default()));

    let pipeline = GazePipeline::new(
        &config,
        ActionMap::from_json(MAPPING, GestureSet::Directional).unwrap(),
        DispatchOptions {
            target_app: TARGET.to_string(),
            toggle_code: None,
            ..Default::default()
        },
        Box::new(StaticForeground(foreground.to_string())),
        Box::new(keys.clone()),
        notifier,
    )
    .unwrap();

    let report = spawn_producer(Box::new(recording(dxs)), pipeline).join();
    assert!(report.exhausted);

    let overlay = overlay.await.unwrap();
    let sent = keys.0.lock().unwrap().clone();
    (sent, overlay.0)
}

fn repeated(dx: i32, n: usize) -> Vec<i32> {
    vec![dx; n]
}

#[tokio::test]
async fn test_majority_window_sends_one_key() {
    let mut dxs = repeated(10, 9);
    dxs.push(0);

    let (sent, events) = run(&dxs, TARGET).await;
    assert_eq!(sent, vec![("down".to_string(), 5)]);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].code, GazeCode::Right);
    assert_eq!(events[0].gaze_label, "Right");
    assert_eq!(events[0].action_label.as_deref(), Some("SCROLL DOWN"));
}

#[tokio::test]
async fn test_split_window_confirms_nothing() {
    let mut dxs = repeated(10, 7);
    dxs.extend(repeated(0, 3));

    let (sent, events) = run(&dxs, TARGET).await;
    assert!(sent.is_empty());
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_unauthorized_foreground_only_notifies() {
    let (sent, events) = run(&repeated(-10, 10), "notepad.exe").await;
    assert!(sent.is_empty());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].code, GazeCode::Left);
    assert!(events[0].action_label.is_none());
}

#[tokio::test]
async fn test_center_rearms_repeat_gesture() {
    let (sent, _) = run(&repeated(10, 20), TARGET).await;
    assert_eq!(sent.len(), 1);

    let mut dxs = repeated(10, 10);
    dxs.extend(repeated(0, 10));
    dxs.extend(repeated(10, 10));
    let (sent, events) = run(&dxs, TARGET).await;
    assert_eq!(sent.len(), 2);
    let codes: Vec<_> = events.iter().map(|e| e.code).collect();
    assert_eq!(codes, vec![GazeCode::Right, GazeCode::Center, GazeCode::Right]);
}
