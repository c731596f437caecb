//! Pipe Runner - A side-scrolling flap-through-the-gaps game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (obstacle field, difficulty, pause countdown, game loop)
//! - `highscores`: Session score and persisted best score
//! - `persistence`: Key-value storage backends for the best score
//! - `settings`: Data-driven game tuning, validated at startup
//! - `error`: Configuration and storage errors

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, StoreError};
pub use highscores::ScoreTracker;
pub use persistence::{KeyValueStore, MemoryStore};
pub use settings::Settings;

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World height; the world scrolls horizontally without a fixed width
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Obstacle pairs kept alive in the field
    pub const PAIRS_IN_FIELD: usize = 4;
    /// Keeps openings away from the top/bottom world edges
    pub const OPENING_MARGIN: i32 = 20;
    /// Horizontal scroll velocity of every obstacle (units/s)
    pub const SCROLL_VELOCITY: f32 = -200.0;
    pub const OBSTACLE_WIDTH: f32 = 52.0;
    pub const OBSTACLE_HEIGHT: f32 = 600.0;

    /// Actor defaults
    pub const ACTOR_START_X: f32 = 80.0;
    pub const ACTOR_START_Y: f32 = 300.0;
    pub const ACTOR_WIDTH: f32 = 34.0;
    pub const ACTOR_HEIGHT: f32 = 24.0;
    /// Downward acceleration on the actor (units/s²)
    pub const GRAVITY: f32 = 600.0;

    /// Score thresholds for tier promotion
    pub const MEDIUM_AT_SCORE: u32 = 10;
    pub const HARD_AT_SCORE: u32 = 50;

    /// Pause/resume countdown
    pub const COUNTDOWN_FROM: u32 = 3;
    pub const COUNTDOWN_INTERVAL_MS: u64 = 1000;

    /// Delay between game over and the fresh session
    pub const RESTART_DELAY_MS: u64 = 1000;

    /// Tint applied to the actor on game over
    pub const GAME_OVER_TINT: u32 = 0xff0000;
}
