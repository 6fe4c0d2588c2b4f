use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const DELAY_MIN: f64 = 2.0;
pub const DELAY_MAX: f64 = 10.0;
pub const DELAY_STEP: f64 = 0.5;

/// The persisted configuration record. Missing keys fall back to their
/// defaults on load, so older or hand-edited files keep working.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_first_run")]
    pub first_run: bool,
    #[serde(default)]
    pub attract_shortcut: String,
    #[serde(default)]
    pub repel_shortcut: String,
    #[serde(default)]
    pub toggle_shortcut: String,
    #[serde(default = "default_delay_seconds")]
    pub delay_seconds: f64,
    #[serde(default)]
    pub storage_path: String,
}

fn default_first_run() -> bool {
    true
}
fn default_delay_seconds() -> f64 {
    4.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            first_run: default_first_run(),
            attract_shortcut: String::new(),
            repel_shortcut: String::new(),
            toggle_shortcut: String::new(),
            delay_seconds: default_delay_seconds(),
            storage_path: String::new(),
        }
    }
}

impl Settings {
    /// Snap a delay to the nearest half-second step within the allowed range.
    pub fn clamp_delay(value: f64) -> f64 {
        let stepped = (value / DELAY_STEP).round() * DELAY_STEP;
        stepped.clamp(DELAY_MIN, DELAY_MAX)
    }
}

/// Reads and writes the singleton [`Settings`] record at a well-known path.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self {
            path: default_settings_path(),
        }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record. Never fails: a missing, unreadable, or malformed
    /// file yields the default record.
    pub fn load(&self) -> Settings {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Settings::default(),
        }
    }

    /// Persist the full record. Writes to a sibling tmp file and renames it
    /// over the final path, so readers only ever see a complete record.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(settings)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    pub fn is_first_run(&self) -> bool {
        self.load().first_run
    }

    pub fn set_first_run(&self, value: bool) -> Result<()> {
        let mut settings = self.load();
        settings.first_run = value;
        self.save(&settings)
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The settings file lives beside the executable so the installation stays
/// portable; the platform config dir is the fallback when the executable
/// path cannot be resolved.
fn default_settings_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("settings.json")))
        .unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("keyloop")
                .join("settings.json")
        })
}
