//! Run settings
//!
//! Stored as JSON. Missing fields take their defaults, so a config file only
//! needs the values it wants to change.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{OBSTACLE_PERIOD_MS, TICK_PERIOD_MS};
use crate::sim::SpawnPolicy;

/// Game settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Milliseconds between simulation ticks
    pub tick_period_ms: u64,
    /// Milliseconds between obstacle spawns
    pub obstacle_period_ms: u64,
    /// Run seed; a random one is picked when absent
    pub seed: Option<u64>,
    /// Whether obstacles keep spawning after game over
    pub spawn_policy: SpawnPolicy,
    /// Let the demo AI steer
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_period_ms: TICK_PERIOD_MS,
            obstacle_period_ms: OBSTACLE_PERIOD_MS,
            seed: None,
            spawn_policy: SpawnPolicy::Always,
            autopilot: false,
        }
    }
}

impl Settings {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn obstacle_period(&self) -> Duration {
        Duration::from_millis(self.obstacle_period_ms)
    }

    /// Seed to use for this run, drawing one from the OS if none is set
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file
    ///
    /// A missing or unreadable file falls back to the defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}; using default settings", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
