//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick(dt)`
//! - Seeded RNG only, one stream per session
//! - Stable iteration order (obstacle pool order)
//! - No rendering or platform dependencies

pub mod actor;
pub mod difficulty;
pub mod field;
pub mod pause;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use actor::{ActorBody, Bounds, Flapper};
pub use difficulty::{
    DifficultyController, DifficultyTable, DifficultyTier, IntRange, Thresholds, TierParams,
};
pub use field::{FieldGeometry, Obstacle, ObstacleField, Orientation, RecycleEvent};
pub use pause::{CountdownStep, PauseCountdown, PauseState};
pub use scheduler::{Fired, Scheduler, TimerHandle};
pub use state::{GameEvent, GamePhase, PAUSE_OVERLAY, Session, TimerEvent, session_seed};
pub use tick::Game;
