//! Game settings and tuning
//!
//! Loaded once at startup from a JSON file; every field has a default so a
//! partial file only overrides what it names.

use serde::{Deserialize, Serialize};

/// Tuning knobs for spawning, difficulty and jumping (all times in ms)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed (None = seeded from the clock by the binary)
    pub seed: Option<u64>,

    // === Spawning ===
    /// Delay before the first obstacle of a session
    pub first_obstacle_delay_ms: u32,
    /// Random gap between obstacle spawns
    pub min_obstacle_rate_ms: u32,
    pub max_obstacle_rate_ms: u32,
    /// Random gap between bonus spawns (also the first bonus delay)
    pub min_bonus_rate_ms: u32,
    pub max_bonus_rate_ms: u32,
    /// Points awarded for a bonus pickup
    pub bonus_value: u32,

    // === Difficulty ===
    /// Move period with nothing passed yet
    pub base_move_period_ms: u32,
    /// Period shaved off per obstacle passed
    pub difficulty_step_ms: u32,
    /// Fastest allowed move period
    pub min_move_period_ms: u32,

    // === Jump ===
    /// One row per tick while rising and falling
    pub jump_period_ms: u32,
    /// Pause at the apex before falling starts
    pub apex_hang_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            first_obstacle_delay_ms: 5000,
            min_obstacle_rate_ms: 500,
            max_obstacle_rate_ms: 8000,
            min_bonus_rate_ms: 15000,
            max_bonus_rate_ms: 40000,
            bonus_value: 10,

            base_move_period_ms: 250,
            difficulty_step_ms: 2,
            min_move_period_ms: 1,

            jump_period_ms: 100,
            apex_hang_ms: 400,
        }
    }
}

impl Settings {
    /// Environment variable naming an alternate settings file
    const PATH_ENV: &'static str = "STICKRUN_SETTINGS";
    /// Settings file looked up in the working directory
    const DEFAULT_PATH: &'static str = "stickrun.json";

    /// Parse settings from JSON (missing fields keep their defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::validated)
    }

    /// Order min/max pairs and keep every period at 1 ms or more
    pub fn validated(mut self) -> Self {
        if self.min_obstacle_rate_ms > self.max_obstacle_rate_ms {
            std::mem::swap(&mut self.min_obstacle_rate_ms, &mut self.max_obstacle_rate_ms);
        }
        if self.min_bonus_rate_ms > self.max_bonus_rate_ms {
            std::mem::swap(&mut self.min_bonus_rate_ms, &mut self.max_bonus_rate_ms);
        }
        self.min_move_period_ms = self.min_move_period_ms.max(1);
        self.base_move_period_ms = self.base_move_period_ms.max(self.min_move_period_ms);
        self.jump_period_ms = self.jump_period_ms.max(1);
        self
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = std::env::var(Self::PATH_ENV).unwrap_or_else(|_| Self::DEFAULT_PATH.to_string());

        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No settings at {path}, using defaults");
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {path}");
                settings
            }
            Err(err) => {
                log::warn!("Ignoring malformed settings in {path}: {err}");
                Self::default()
            }
        }
    }
}
