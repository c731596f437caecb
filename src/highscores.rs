//! Session score and persisted best score
//!
//! The best score lives in a [`KeyValueStore`] under [`HIGHSCORE_KEY`] as a
//! base-10 integer string. It is read at session start (for display) and
//! read/written once more at game over.

use crate::persistence::KeyValueStore;

/// Storage key for the best score
pub const HIGHSCORE_KEY: &str = "highscore";

/// Read the persisted best score. Missing or unreadable values count as 0.
pub fn load_best(store: &dyn KeyValueStore) -> u32 {
    match store.get(HIGHSCORE_KEY) {
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(best) => best,
            Err(_) => {
                log::warn!("Ignoring unreadable best score {:?}", raw);
                0
            }
        },
        None => 0,
    }
}

/// Score for one session
#[derive(Debug, Clone, Default)]
pub struct ScoreTracker {
    score: u32,
    best_at_start: u32,
}

impl ScoreTracker {
    /// Start at 0, remembering the best score on record for display
    pub fn new(store: &dyn KeyValueStore) -> Self {
        Self {
            score: 0,
            best_at_start: load_best(store),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Best score on record when the session started
    pub fn best_at_start(&self) -> u32 {
        self.best_at_start
    }

    /// Add one point, returning the new score
    pub fn increment(&mut self) -> u32 {
        self.score += 1;
        self.score
    }

    /// Persist the score if it beats the stored best. Returns the best after
    /// the update. A failed write is logged; the game carries on.
    pub fn on_game_over(&self, store: &mut dyn KeyValueStore) -> u32 {
        let best = load_best(store);
        if self.score <= best {
            return best;
        }

        if let Err(e) = store.set(HIGHSCORE_KEY, &self.score.to_string()) {
            log::warn!("Failed to save best score {}: {}", self.score, e);
        } else {
            log::info!("New best score: {} (was {})", self.score, best);
        }
        self.score
    }
}
