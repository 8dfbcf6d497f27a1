//! Tunable game rules.
//!
//! Defaults reproduce the classic Thirst Mode balance. A JSON file in the
//! user's config directory may override any subset of the fields.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<GameRules>();
    app.insert_resource(GameRules::load());
}

/// Errors raised while reading or validating a rules file.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rules file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("clean probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
    #[error("fall duration range {min}..{max} ms is empty")]
    EmptyFallRange { min: u32, max: u32 },
    #[error("{0} interval must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("playfield width {width} cannot fit a {drop_size}px drop")]
    PlayfieldTooNarrow { width: f32, drop_size: f32 },
    #[error("max hydration {0} must be positive")]
    NonPositiveMaxHydration(i32),
    #[error("starting hydration {starting} is outside 1..={max}")]
    StartingHydrationOutOfRange { starting: i32, max: i32 },
    #[error("drain per tick {0} must be positive")]
    NonPositiveDrain(i32),
}

/// Every number the game loop depends on.
#[derive(Resource, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct GameRules {
    pub starting_hydration: i32,
    pub max_hydration: i32,
    pub drain_per_tick: i32,
    pub tick_interval_ms: u64,
    pub spawn_interval_ms: u64,
    /// Chance that a freshly spawned drop is clean.
    pub clean_probability: f64,
    pub fall_duration_min_ms: u32,
    /// Exclusive upper bound.
    pub fall_duration_max_ms: u32,
    pub clean_reward: i32,
    pub dirty_penalty: i32,
    pub missed_clean_penalty: i32,
    /// How long the game-over message stays up before the home view returns.
    pub return_home_delay_ms: u64,
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub drop_size: f32,
    pub edge_margin: f32,
    /// Fixed seed for drop sampling. Random when unset.
    pub seed: Option<u64>,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_hydration: 100,
            max_hydration: 100,
            drain_per_tick: 1,
            tick_interval_ms: 1000,
            spawn_interval_ms: 800,
            clean_probability: 0.68,
            fall_duration_min_ms: 3500,
            fall_duration_max_ms: 7000,
            clean_reward: 10,
            dirty_penalty: 14,
            missed_clean_penalty: 6,
            return_home_delay_ms: 1200,
            playfield_width: 480.0,
            playfield_height: 520.0,
            drop_size: 64.0,
            edge_margin: 8.0,
            seed: None,
        }
    }
}

impl GameRules {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn return_home_delay(&self) -> Duration {
        Duration::from_millis(self.return_home_delay_ms)
    }

    /// Reject values that would make the loop panic or never progress.
    pub fn validate(&self) -> Result<(), RulesError> {
        if !(0.0..=1.0).contains(&self.clean_probability) {
            return Err(RulesError::InvalidProbability(self.clean_probability));
        }
        if self.fall_duration_min_ms >= self.fall_duration_max_ms {
            return Err(RulesError::EmptyFallRange {
                min: self.fall_duration_min_ms,
                max: self.fall_duration_max_ms,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(RulesError::ZeroInterval("tick"));
        }
        if self.spawn_interval_ms == 0 {
            return Err(RulesError::ZeroInterval("spawn"));
        }
        if self.playfield_width < self.drop_size {
            return Err(RulesError::PlayfieldTooNarrow {
                width: self.playfield_width,
                drop_size: self.drop_size,
            });
        }
        if self.max_hydration <= 0 {
            return Err(RulesError::NonPositiveMaxHydration(self.max_hydration));
        }
        if !(1..=self.max_hydration).contains(&self.starting_hydration) {
            return Err(RulesError::StartingHydrationOutOfRange {
                starting: self.starting_hydration,
                max: self.max_hydration,
            });
        }
        if self.drain_per_tick <= 0 {
            return Err(RulesError::NonPositiveDrain(self.drain_per_tick));
        }
        Ok(())
    }

    /// Parse and validate rules from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let rules: Self = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn read_from(path: &Path) -> Result<Self, RulesError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Get the file path for the rules override.
    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("thirst-mode").join("rules.json"))
    }

    /// Load rules from disk, falling back to the defaults on any problem.
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            warn!("Could not determine config directory for game rules");
            return Self::default();
        };

        if !path.exists() {
            info!("No rules file found at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::read_from(&path) {
            Ok(rules) => {
                info!("Loaded game rules from {:?}", path);
                rules
            }
            Err(e) => {
                warn!("Ignoring rules file {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}
