//! Difficulty tiers and score-driven tier promotion

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::is_positive;

/// Difficulty levels, ordered from easiest to hardest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "easy",
            DifficultyTier::Medium => "medium",
            DifficultyTier::Hard => "hard",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive integer range sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn is_valid(&self) -> bool {
        self.min > 0 && self.min <= self.max
    }

    /// True when `self` sits inside `wider`'s bounds (never looser on either side)
    fn is_tighter_than(&self, wider: &IntRange) -> bool {
        self.min <= wider.min && self.max <= wider.max
    }
}

/// Generation parameters for one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierParams {
    /// Vertical gap between an obstacle pair
    pub opening: IntRange,
    /// Horizontal distance from the rightmost obstacle to the next pair
    pub spacing: IntRange,
    /// Upward velocity applied on flap
    pub impulse_velocity: f32,
}

/// Static tier -> parameters table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub easy: TierParams,
    pub medium: TierParams,
    pub hard: TierParams,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: TierParams {
                opening: IntRange::new(150, 250),
                spacing: IntRange::new(250, 600),
                impulse_velocity: 300.0,
            },
            medium: TierParams {
                opening: IntRange::new(140, 200),
                spacing: IntRange::new(250, 450),
                impulse_velocity: 315.0,
            },
            hard: TierParams {
                opening: IntRange::new(120, 170),
                spacing: IntRange::new(250, 350),
                impulse_velocity: 330.0,
            },
        }
    }
}

impl DifficultyTable {
    pub fn get(&self, tier: DifficultyTier) -> &TierParams {
        match tier {
            DifficultyTier::Easy => &self.easy,
            DifficultyTier::Medium => &self.medium,
            DifficultyTier::Hard => &self.hard,
        }
    }

    /// Check every tier against the world it will be placed in.
    ///
    /// The widest opening must leave room for at least one anchor position
    /// between the margins, and each tier must be at least as tight as the
    /// one before it.
    pub fn validate(&self, world_height: f32, margin: i32) -> Result<(), ConfigError> {
        let usable = world_height as i32 - 2 * margin;
        let mut previous: Option<&TierParams> = None;

        for tier in DifficultyTier::ALL {
            let params = self.get(tier);
            for (what, range) in [("opening", &params.opening), ("spacing", &params.spacing)] {
                if !range.is_valid() {
                    return Err(ConfigError::BadRange {
                        tier,
                        what,
                        min: range.min,
                        max: range.max,
                    });
                }
            }
            if params.opening.max > usable {
                return Err(ConfigError::OpeningTooLarge {
                    tier,
                    opening: params.opening.max,
                    height: world_height,
                    margin,
                });
            }
            if !is_positive(params.impulse_velocity) {
                return Err(ConfigError::BadImpulse {
                    tier,
                    velocity: params.impulse_velocity,
                });
            }
            if let Some(prev) = previous {
                if !params.opening.is_tighter_than(&prev.opening) {
                    return Err(ConfigError::NotMonotonic { tier, what: "opening" });
                }
                if !params.spacing.is_tighter_than(&prev.spacing) {
                    return Err(ConfigError::NotMonotonic { tier, what: "spacing" });
                }
            }
            previous = Some(params);
        }

        Ok(())
    }
}

/// Score thresholds at which the tier is promoted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub medium: u32,
    pub hard: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            medium: MEDIUM_AT_SCORE,
            hard: HARD_AT_SCORE,
        }
    }
}

impl Thresholds {
    /// Tier a score alone would earn
    pub fn tier_for(&self, score: u32) -> DifficultyTier {
        if score >= self.hard {
            DifficultyTier::Hard
        } else if score >= self.medium {
            DifficultyTier::Medium
        } else {
            DifficultyTier::Easy
        }
    }
}

/// Tracks the session's tier. Promotion only, never demotion.
#[derive(Debug, Clone)]
pub struct DifficultyController {
    tier: DifficultyTier,
    thresholds: Thresholds,
}

impl DifficultyController {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            tier: DifficultyTier::Easy,
            thresholds,
        }
    }

    pub fn tier(&self) -> DifficultyTier {
        self.tier
    }

    /// Re-evaluate after a score change. Returns the new tier if it changed.
    pub fn evaluate(&mut self, score: u32) -> Option<DifficultyTier> {
        let earned = self.thresholds.tier_for(score);
        if earned > self.tier {
            log::debug!("Difficulty {} -> {} at score {}", self.tier, earned, score);
            self.tier = earned;
            Some(earned)
        } else {
            None
        }
    }
}
