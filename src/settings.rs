//! Run settings
//!
//! Loaded from a JSON file named by `DERBY_SETTINGS` (or passed explicitly).
//! Every field is optional in the file; missing ones take the defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FIELD, TICK_INTERVAL_MS};
use crate::error::SettingsError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Milliseconds between playback ticks
    pub tick_interval_ms: u64,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
    /// Horses per race, including the player
    pub field_size: usize,
    /// Let the autopilot ride
    pub autopilot: bool,
    /// Player's starting purse
    pub purse: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            seed: None,
            field_size: MAX_FIELD,
            autopilot: true,
            purse: 10_000,
        }
    }
}

impl Settings {
    /// Environment variable naming the settings file
    const ENV_KEY: &'static str = "DERBY_SETTINGS";

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.field_size = settings.field_size.clamp(1, MAX_FIELD);
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from `path`, or from `DERBY_SETTINGS` when no path is
    /// given. Falls back to defaults on any failure.
    pub fn load(path: Option<&Path>) -> Self {
        let from_env = std::env::var_os(Self::ENV_KEY);
        let path = match path.or(from_env.as_deref().map(Path::new)) {
            Some(path) => path,
            None => {
                log::info!("Using default settings");
                return Self::default();
            }
        };

        match Self::from_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
