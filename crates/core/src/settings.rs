use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dialogue::DEFAULT_COOLDOWN_TICKS;
use crate::keys::{Key, KeyError};
use crate::logger;
use crate::platform::hotkey::Hotkey;
use crate::types::{Color, ReferencePoint};

/// Operator-editable configuration, read from `settings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Executable names of the target, tried in order.
    pub process_names: Vec<String>,
    /// Dialogue probe on the 1920x1080 canvas.
    pub points: Vec<ReferencePoint>,
    pub advance_key: String,
    pub pause_hotkey: Vec<String>,
    pub capture_hotkey: Vec<String>,
    pub tick_ms: u64,
    pub key_press_ms: u64,
    pub hotkey_debounce_ms: u64,
    pub acquire_poll_ms: u64,
    pub cooldown_ticks: u32,
    pub min_window_width: i32,
    pub screenshot_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            process_names: vec!["YuanShen.exe".into(), "GenshinImpact.exe".into()],
            points: vec![
                // white part of the hide-dialogue button
                ReferencePoint { x: 280, y: 35, color: Color::rgb(236, 229, 216) },
                // dark part of the same button
                ReferencePoint { x: 271, y: 49, color: Color::rgb(59, 67, 84) },
            ],
            advance_key: "F".into(),
            pause_hotkey: vec!["Alt".into(), "P".into()],
            capture_hotkey: vec!["Alt".into(), "K".into()],
            tick_ms: 125,
            key_press_ms: 75,
            hotkey_debounce_ms: 400,
            acquire_poll_ms: 200,
            cooldown_ticks: DEFAULT_COOLDOWN_TICKS,
            min_window_width: 400,
            screenshot_dir: PathBuf::from("screenshots"),
        }
    }
}

/// Settings with every key name resolved against the key table.
#[derive(Debug, Clone)]
pub struct ResolvedKeys {
    pub advance: Key,
    pub pause: Hotkey,
    pub capture: Hotkey,
}

impl Settings {
    /// Defaults when the file is missing. A file that exists but does not
    /// parse also falls back to defaults, with a warning.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::read(path) {
            Ok(settings) => settings,
            Err(e) => {
                logger::warn(&format!("{:#}, using defaults", e));
                Self::default()
            }
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Fails fast on an unknown key name; that is a configuration error.
    pub fn resolve_keys(&self) -> Result<ResolvedKeys, KeyError> {
        Ok(ResolvedKeys {
            advance: Key::lookup(&self.advance_key)?,
            pause: Hotkey::parse(&self.pause_hotkey)?,
            capture: Hotkey::parse(&self.capture_hotkey)?,
        })
    }
}
