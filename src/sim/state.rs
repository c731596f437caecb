//! Session state
//!
//! Everything that belongs to one play session. A restart throws the whole
//! session away and builds a new one; nothing is reset in place.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{DifficultyController, DifficultyTier};
use super::field::ObstacleField;
use super::pause::{PauseCountdown, PauseState};
use super::scheduler::{Scheduler, TimerHandle};
use crate::highscores::ScoreTracker;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (possibly paused)
    Playing,
    /// Run ended, waiting for the restart timer
    GameOver,
}

/// What the session's timers fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    CountdownTick,
    Restart,
}

/// Events for the presentation layer (HUD, overlays, sound)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ScoreChanged { score: u32 },
    TierChanged { tier: DifficultyTier },
    Flapped { velocity: f32 },
    Paused,
    /// Ask the scene collaborator to show a named overlay
    OverlayLaunched { name: &'static str },
    CountdownStarted { remaining: u32 },
    CountdownTick { remaining: u32 },
    Resumed,
    GameOver { score: u32, best: u32 },
    SessionRestarted { session: u32 },
}

/// Name of the overlay shown while paused
pub const PAUSE_OVERLAY: &str = "pause";

/// Derive a session's seed from the base seed (stable across runs)
pub fn session_seed(base: u64, session: u32) -> u64 {
    base.wrapping_add((session as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// One play session
#[derive(Debug)]
pub struct Session {
    /// 0 for the first session, +1 per restart
    pub index: u32,
    pub seed: u64,
    pub phase: GamePhase,
    pub score: ScoreTracker,
    pub difficulty: DifficultyController,
    pub field: ObstacleField,
    pub pause: PauseCountdown<TimerEvent>,
    pub timers: Scheduler<TimerEvent>,
    /// Pending restart after game over
    pub restart_timer: Option<TimerHandle>,
    pub rng: Pcg32,
    /// Simulation frames played in this session
    pub frames: u64,
}

impl Session {
    /// Build a fresh session: score 0, easy tier, newly placed field
    pub fn new(settings: &Settings, store: &dyn KeyValueStore, index: u32) -> Self {
        let seed = session_seed(settings.seed, index);
        let mut rng = Pcg32::seed_from_u64(seed);
        let difficulty = DifficultyController::new(settings.thresholds);
        let field = ObstacleField::new(
            settings.pairs,
            settings.field_geometry(),
            settings.tiers.get(difficulty.tier()),
            &mut rng,
        );

        log::info!("Session {} started with seed {}", index, seed);

        Self {
            index,
            seed,
            phase: GamePhase::Playing,
            score: ScoreTracker::new(store),
            difficulty,
            field,
            pause: PauseCountdown::new(
                settings.countdown_from,
                settings.countdown_interval(),
                TimerEvent::CountdownTick,
            ),
            timers: Scheduler::new(),
            restart_timer: None,
            rng,
            frames: 0,
        }
    }

    /// World motion runs only while playing and not paused
    pub fn world_running(&self) -> bool {
        self.phase == GamePhase::Playing && self.pause.state() == PauseState::Running
    }

    /// Release every timer the session holds
    pub fn teardown(&mut self) {
        self.pause.cancel(&mut self.timers);
        if let Some(handle) = self.restart_timer.take() {
            self.timers.cancel(handle);
        }
        self.timers.cancel_all();
        log::debug!("Session {} torn down", self.index);
    }
}
