//! Error types
//!
//! Configuration errors are fatal: the game refuses to start. Storage errors
//! are logged and otherwise ignored.

use thiserror::Error;

use crate::sim::DifficultyTier;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("world must have a positive height, got {height}")]
    WorldSize { height: f32 },
    #[error("obstacle field needs at least one pair")]
    EmptyField,
    #[error("opening margin must not be negative, got {margin}")]
    NegativeMargin { margin: i32 },
    #[error("obstacles must scroll leftward, got velocity {velocity}")]
    ScrollVelocity { velocity: f32 },
    #[error("obstacles must have a positive size, got {width}x{height}")]
    ObstacleSize { width: f32, height: f32 },
    #[error("{tier} {what} range {min}..={max} is empty or not positive")]
    BadRange {
        tier: DifficultyTier,
        what: &'static str,
        min: i32,
        max: i32,
    },
    #[error("{tier} openings up to {opening} overflow height {height} with margin {margin}")]
    OpeningTooLarge {
        tier: DifficultyTier,
        opening: i32,
        height: f32,
        margin: i32,
    },
    #[error("{tier} {what} range must not be wider than the previous tier")]
    NotMonotonic {
        tier: DifficultyTier,
        what: &'static str,
    },
    #[error("{tier} impulse velocity must be positive, got {velocity}")]
    BadImpulse { tier: DifficultyTier, velocity: f32 },
    #[error("medium threshold {medium} is above hard threshold {hard}")]
    Thresholds { medium: u32, hard: u32 },
    #[error("countdown must start above zero with a non-zero interval")]
    Countdown,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
