//! Game settings and tuning
//!
//! Every field has a default, so a settings file only needs the values it
//! changes. Settings are validated before a game may start.

use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::difficulty::{DifficultyTable, Thresholds};
use crate::sim::field::FieldGeometry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    pub world_height: f32,

    // === Obstacle field ===
    /// Obstacle pairs in the recycled pool
    pub pairs: usize,
    /// Openings never come closer than this to the top/bottom edges
    pub opening_margin: i32,
    /// Horizontal obstacle velocity (units/s, negative = leftward)
    pub scroll_velocity: f32,
    pub obstacle_width: f32,
    pub obstacle_height: f32,

    // === Actor ===
    pub start_x: f32,
    pub start_y: f32,
    pub gravity: f32,

    // === Difficulty ===
    pub tiers: DifficultyTable,
    pub thresholds: Thresholds,

    // === Timing ===
    pub countdown_from: u32,
    pub countdown_interval_ms: u64,
    pub restart_delay_ms: u64,

    /// Base RNG seed; each session derives its own from this
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_height: WORLD_HEIGHT,

            pairs: PAIRS_IN_FIELD,
            opening_margin: OPENING_MARGIN,
            scroll_velocity: SCROLL_VELOCITY,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,

            start_x: ACTOR_START_X,
            start_y: ACTOR_START_Y,
            gravity: GRAVITY,

            tiers: DifficultyTable::default(),
            thresholds: Thresholds::default(),

            countdown_from: COUNTDOWN_FROM,
            countdown_interval_ms: COUNTDOWN_INTERVAL_MS,
            restart_delay_ms: RESTART_DELAY_MS,

            seed: 0,
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Reject settings the game cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.world_height) {
            return Err(ConfigError::WorldSize {
                height: self.world_height,
            });
        }
        if self.pairs == 0 {
            return Err(ConfigError::EmptyField);
        }
        if self.opening_margin < 0 {
            return Err(ConfigError::NegativeMargin {
                margin: self.opening_margin,
            });
        }
        if !is_positive(-self.scroll_velocity) {
            return Err(ConfigError::ScrollVelocity {
                velocity: self.scroll_velocity,
            });
        }
        if !is_positive(self.obstacle_width) || !is_positive(self.obstacle_height) {
            return Err(ConfigError::ObstacleSize {
                width: self.obstacle_width,
                height: self.obstacle_height,
            });
        }
        self.tiers.validate(self.world_height, self.opening_margin)?;
        if self.thresholds.medium > self.thresholds.hard {
            return Err(ConfigError::Thresholds {
                medium: self.thresholds.medium,
                hard: self.thresholds.hard,
            });
        }
        if self.countdown_from == 0 || self.countdown_interval_ms == 0 {
            return Err(ConfigError::Countdown);
        }
        Ok(())
    }

    pub fn field_geometry(&self) -> FieldGeometry {
        FieldGeometry {
            world_height: self.world_height,
            margin: self.opening_margin,
            velocity: self.scroll_velocity,
            obstacle_size: Vec2::new(self.obstacle_width, self.obstacle_height),
        }
    }

    pub fn start_position(&self) -> Vec2 {
        Vec2::new(self.start_x, self.start_y)
    }

    pub fn countdown_interval(&self) -> Duration {
        Duration::from_millis(self.countdown_interval_ms)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }
}

/// Finite and above zero (NaN is neither)
pub(crate) fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
