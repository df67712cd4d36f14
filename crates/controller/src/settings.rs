//! Controller settings
//!
//! Loaded from an optional TOML/JSON file plus `GAZE_CONTROL__*` environment
//! overrides (e.g. `GAZE_CONTROL__DISPATCH__TARGET_APP=AcroRd32.exe`).

use std::path::{Path, PathBuf};

use command::DispatchOptions;
use gaze::GazeConfig;
use platform::KeyDelivery;
use serde::{Deserialize, Serialize};

use crate::ControllerError;

/// Default settings file looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "gaze-control";

/// Top-level controller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// Enable debug logging
    pub debug: bool,

    /// Interpreter and debouncer tuning
    pub gaze: GazeConfig,

    /// Capture rate; with `window_secs` it overrides `gaze.window_size`
    pub fps: Option<f64>,

    /// Confirmation window duration (seconds)
    pub window_secs: Option<f64>,

    /// Target application and toggle behavior
    pub dispatch: DispatchOptions,

    /// Action map JSON; the built-in PDF mapping is used when unset
    pub actions_path: Option<PathBuf>,

    /// Native injection or dry run
    pub key_delivery: KeyDelivery,

    /// Treat this application as always focused instead of querying the OS
    pub assume_foreground: Option<String>,

    /// Recorded detections to replay
    pub replay_path: Option<PathBuf>,

    /// Flip replayed detections (masks and side labels); for recordings
    /// captured without the selfie flip
    pub mirror: bool,

    /// Overlay screen size
    pub screen_width: u32,
    pub screen_height: u32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            debug: false,
            gaze: GazeConfig::default(),
            fps: None,
            window_secs: None,
            dispatch: DispatchOptions::default(),
            actions_path: None,
            key_delivery: KeyDelivery::Native,
            assume_foreground: None,
            replay_path: None,
            mirror: false,
            screen_width: 1920,
            screen_height: 1080,
        }
    }
}

impl ControllerSettings {
    /// Load settings; an explicit path must exist, the default file is optional
    pub fn load(path: Option<&Path>) -> Result<Self, ControllerError> {
        Self::load_with_env(path, None)
    }

    /// Load, reading overrides from `env` in place of the process environment when given
    fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ControllerError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_SETTINGS_FILE).required(false),
        };

        let settings: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("GAZE_CONTROL")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        settings.gaze_config().validate()?;
        settings.dispatch.validate()?;
        Ok(settings)
    }

    /// Gaze configuration with the rate-derived window applied
    pub fn gaze_config(&self) -> GazeConfig {
        match (self.fps, self.window_secs) {
            (Some(fps), Some(secs)) => self.gaze.clone().with_rate(fps, secs),
            _ => self.gaze.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaze::{GazeCode, GestureSet};
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let settings = ControllerSettings::default();
        assert_eq!(settings.gaze_config().window_size, 30);
        assert_eq!(settings.dispatch.target_app, "msedge.exe");
        assert_eq!(settings.dispatch.toggle_code, Some(GazeCode::BothClose));
    }

    #[test]
    fn test_load_from_file() {
        let path = write_temp(
            "settings.toml",
            r#"
debug = true
fps = 10.0
window_secs = 1.0

[gaze]
gesture_set = "blink"
agreement_ratio = 0.8

[dispatch]
target_app = "AcroRd32.exe"
toggle_code = "RightClose"
"#,
        );

        let settings = ControllerSettings::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(settings.debug);
        let gaze = settings.gaze_config();
        assert_eq!(gaze.window_size, 10);
        assert_eq!(gaze.gesture_set, GestureSet::Blink);
        assert_eq!(gaze.required_agreement(), 8);
        assert_eq!(settings.dispatch.target_app, "AcroRd32.exe");
        assert_eq!(settings.dispatch.toggle_code, Some(GazeCode::RightClose));
        assert_eq!(settings.key_delivery, KeyDelivery::Native);
    }

    #[test]
    fn test_invalid_gaze_settings_rejected() {
        let path = write_temp("bad.toml", "[gaze]\nagreement_ratio = 0.4\n");
        let result = ControllerSettings::load(Some(&path));
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ControllerError::Gaze(_))));
    }

    #[test]
    fn test_environment_overrides_file() {
        let path = write_temp(
            "env.toml",
            "[dispatch]\ntarget_app = \"msedge.exe\"\n\n[gaze]\nwindow_size = 30\n",
        );
        let env: config::Map<String, String> = [
            ("GAZE_CONTROL__DISPATCH__TARGET_APP", "AcroRd32.exe"),
            ("GAZE_CONTROL__GAZE__WINDOW_SIZE", "12"),
            ("GAZE_CONTROL__KEY_DELIVERY", "dry_run"),
            ("GAZE_CONTROL__DEBUG", "true"),
            ("UNRELATED__DEBUG", "false"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let settings = ControllerSettings::load_with_env(Some(&path), Some(env)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.dispatch.target_app, "AcroRd32.exe");
        assert_eq!(settings.gaze_config().window_size, 12);
        assert_eq!(settings.key_delivery, KeyDelivery::DryRun);
        assert!(settings.debug);
    }

    #[test]
    fn test_center_toggle_rejected() {
        let path = write_temp("center.toml", "[dispatch]\ntoggle_code = \"Center\"\n");
        let result = ControllerSettings::load_with_env(Some(&path), Some(config::Map::new()));
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ControllerError::Command(_))));
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = ControllerSettings::load(Some(Path::new("/nonexistent/gaze.toml")));
        assert!(matches!(result, Err(ControllerError::Settings(_))));
    }
}
