//! Action map: gaze code to per-mode key commands

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use gaze::{GazeCode, GestureSet};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{CommandError, DisplayMode, KeyError};

/// Largest accepted repeat count
const MAX_REPEAT: u32 = 10;

/// Built-in mapping for a PDF viewer (`[fit page, fit width]` per code)
pub const DEFAULT_ACTIONS_JSON: &str = r#"{
    "0": [["pagedown", 1, "NEXT PAGE"], ["down", 5, "SCROLL DOWN"]],
    "1": [["pageup", 1, "PREV PAGE"], ["up", 5, "SCROLL UP"]],
    "2": null,
    "3": [["up", 5, "SCROLL UP"], ["pageup", 1, "PREV PAGE"]],
    "4": [["down", 5, "SCROLL DOWN"], ["pagedown", 1, "NEXT PAGE"]],
    "5": [["ctrl+\\", 1, "FIT WIDTH"], ["ctrl+\\", 1, "FIT PAGE"]]
}"#;

/// A key press to inject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCommand {
    /// Key spec, e.g. `pagedown` or `ctrl+\`
    pub key: String,
    /// Number of presses
    pub repeat: u32,
    /// Overlay label
    pub label: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawKey {
    Pair(String, u32),
    Labeled(String, u32, String),
    Detailed {
        key: String,
        #[serde(default = "default_repeat")]
        repeat: u32,
        #[serde(default)]
        label: Option<String>,
    },
}

fn default_repeat() -> u32 {
    1
}

type ModeKeys = [Option<KeyCommand>; 2];

/// Validated gaze-code to key mapping
#[derive(Debug, Clone, Default)]
pub struct ActionMap {
    entries: HashMap<GazeCode, Option<ModeKeys>>,
}

impl ActionMap {
    /// Load and validate a JSON action map from disk
    pub fn load(path: impl AsRef<Path>, gesture_set: GestureSet) -> Result<Self, CommandError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| CommandError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let map = Self::from_json(&text, gesture_set)?;
        info!("Loaded {} action entries from {}", map.entries.len(), path.display());
        Ok(map)
    }

    /// Built-in PDF viewer mapping
    pub fn builtin(gesture_set: GestureSet) -> Result<Self, CommandError> {
        Self::from_json(DEFAULT_ACTIONS_JSON, gesture_set)
    }

    /// Parse and validate; every code reachable under `gesture_set` must be present
    pub fn from_json(text: &str, gesture_set: GestureSet) -> Result<Self, CommandError> {
        let raw: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(text).map_err(|e| CommandError::Malformed(e.to_string()))?;

        let mut entries = HashMap::new();
        for (key, value) in raw {
            let code = key
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(GazeCode::from_index)
                .ok_or_else(|| CommandError::UnknownCode(key.clone()))?;
            entries.insert(code, parse_entry(code, value)?);
        }

        for &code in gesture_set.reachable_codes() {
            if !entries.contains_key(&code) {
                return Err(CommandError::MissingEntry(code));
            }
        }

        debug!("Action map validated for {:?} gesture set", gesture_set);
        Ok(Self { entries })
    }

    /// Key command for a code in the given mode, if any
    pub fn lookup(&self, code: GazeCode, mode: DisplayMode) -> Option<&KeyCommand> {
        self.entries
            .get(&code)?
            .as_ref()?
            .get(mode.index())?
            .as_ref()
    }

    /// Whether the map has an entry (possibly null) for a code
    pub fn contains(&self, code: GazeCode) -> bool {
        self.entries.contains_key(&code)
    }

    /// Every mapped key command, in gaze code then mode order
    pub fn commands(&self) -> impl Iterator<Item = (GazeCode, DisplayMode, &KeyCommand)> + '_ {
        GazeCode::ALL.into_iter().flat_map(move |code| {
            DisplayMode::ALL
                .into_iter()
                .filter_map(move |mode| self.lookup(code, mode).map(|key| (code, mode, key)))
        })
    }

    /// Run every key through `check`; the first rejected key fails naming its code
    pub fn check_keys<F>(&self, check: F) -> Result<(), CommandError>
    where
        F: Fn(&str) -> Result<(), KeyError>,
    {
        for (code, mode, command) in self.commands() {
            check(&command.key).map_err(|e| CommandError::InvalidEntry {
                code,
                reason: format!("{} mode key '{}': {}", mode.label(), command.key, e),
            })?;
        }
        Ok(())
    }
}

fn parse_entry(code: GazeCode, value: serde_json::Value) -> Result<Option<ModeKeys>, CommandError> {
    let invalid = |reason: String| CommandError::InvalidEntry { code, reason };

    let raw: Option<Vec<Option<RawKey>>> =
        serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
    let Some(raw) = raw else {
        return Ok(None);
    };

    if code == GazeCode::Center {
        return Err(invalid("Center re-arms dispatch and must map to null".into()));
    }
    if raw.len() != 2 {
        return Err(invalid(format!(
            "expected 2 mode entries [page, scroll], found {}",
            raw.len()
        )));
    }

    let mut keys: ModeKeys = [None, None];
    for (slot, raw_key) in keys.iter_mut().zip(raw) {
        *slot = raw_key.map(to_command).transpose().map_err(invalid)?;
    }
    Ok(Some(keys))
}

fn to_command(raw: RawKey) -> Result<KeyCommand, String> {
    let (key, repeat, label) = match raw {
        RawKey::Pair(key, repeat) => (key, repeat, None),
        RawKey::Labeled(key, repeat, label) => (key, repeat, Some(label)),
        RawKey::Detailed { key, repeat, label } => (key, repeat, label),
    };

    let key = key.trim().to_string();
    if key.is_empty() {
        return Err("empty key".into());
    }
    if !(1..=MAX_REPEAT).contains(&repeat) {
        return Err(format!("repeat {} outside 1..={}", repeat, MAX_REPEAT));
    }

    let label = label.unwrap_or_else(|| key.to_uppercase());
    Ok(KeyCommand { key, repeat, label })
}
