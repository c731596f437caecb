//! Per-frame game loop
//!
//! [`Game`] owns the settings, the best-score store and the current session.
//! The host calls [`Game::tick`] once per frame after stepping the actor's
//! physics, and forwards input and collision signals as they happen.

use std::time::Duration;

use super::actor::ActorBody;
use super::difficulty::DifficultyTier;
use super::pause::{CountdownStep, PauseState};
use super::state::{GameEvent, GamePhase, PAUSE_OVERLAY, Session, TimerEvent};
use crate::consts::GAME_OVER_TINT;
use crate::error::ConfigError;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;

pub struct Game<S: KeyValueStore> {
    settings: Settings,
    store: S,
    session: Session,
}

impl<S: KeyValueStore> Game<S> {
    /// Validate `settings` and start the first session. Invalid settings
    /// refuse to start.
    pub fn new(settings: Settings, store: S) -> Result<Self, ConfigError> {
        settings.validate()?;
        let session = Session::new(&settings, &store, 0);
        Ok(Self {
            settings,
            store,
            session,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn score(&self) -> u32 {
        self.session.score.score()
    }

    pub fn tier(&self) -> DifficultyTier {
        self.session.difficulty.tier()
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn pause_state(&self) -> PauseState {
        self.session.pause.state()
    }

    /// Pointer-down. Dropped silently unless playing and running.
    pub fn flap(&mut self, actor: &mut dyn ActorBody) -> Option<GameEvent> {
        if self.session.phase != GamePhase::Playing || !self.session.pause.accepts_impulse() {
            return None;
        }
        let velocity = self
            .settings
            .tiers
            .get(self.session.difficulty.tier())
            .impulse_velocity;
        actor.apply_impulse(velocity);
        Some(GameEvent::Flapped { velocity })
    }

    /// Pause signal: freeze the world and show the pause overlay
    pub fn pause(&mut self, actor: &mut dyn ActorBody) -> Vec<GameEvent> {
        if self.session.phase != GamePhase::Playing || !self.session.pause.pause(actor) {
            return Vec::new();
        }
        vec![
            GameEvent::Paused,
            GameEvent::OverlayLaunched {
                name: PAUSE_OVERLAY,
            },
        ]
    }

    /// Resume signal: start the countdown (once)
    pub fn resume(&mut self) -> Vec<GameEvent> {
        let Session { pause, timers, .. } = &mut self.session;
        match pause.resume(timers) {
            Some(remaining) => vec![GameEvent::CountdownStarted { remaining }],
            None => Vec::new(),
        }
    }

    /// Physics reported the actor overlapping an obstacle
    pub fn on_collision(&mut self, actor: &mut dyn ActorBody) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.game_over(actor, &mut events);
        events
    }

    /// Advance one frame of `dt` seconds. Steps that are not a positive,
    /// representable duration are dropped without touching the session.
    pub fn tick(&mut self, actor: &mut dyn ActorBody, dt: f32) -> Vec<GameEvent> {
        let step = match Duration::try_from_secs_f32(dt) {
            Ok(step) if !step.is_zero() => step,
            _ => {
                log::warn!("Ignoring frame step of {} s", dt);
                return Vec::new();
            }
        };
        let mut events = Vec::new();

        if self.fire_timers(actor, step, &mut events) {
            // Fresh session; its first frame starts next tick
            return events;
        }
        if !self.session.world_running() {
            return events;
        }

        self.session.frames += 1;
        self.session.field.advance(dt);

        // End condition precedes scoring
        let bounds = actor.bounds();
        if bounds.bottom >= self.settings.world_height || bounds.top <= 0.0 {
            self.game_over(actor, &mut events);
            return events;
        }

        let tiers = &self.settings.tiers;
        let Session {
            field,
            rng,
            score,
            difficulty,
            ..
        } = &mut self.session;
        let current = *tiers.get(difficulty.tier());
        let recycled = field.recycle(rng, current, |_| {
            let points = score.increment();
            events.push(GameEvent::ScoreChanged { score: points });
            if let Some(tier) = difficulty.evaluate(points) {
                events.push(GameEvent::TierChanged { tier });
            }
            *tiers.get(difficulty.tier())
        });
        if recycled > 0 {
            log::debug!("Recycled {} pair(s) at frame {}", recycled, self.session.frames);
        }

        events
    }

    /// Deliver due timers. Returns true if the session was restarted.
    fn fire_timers(
        &mut self,
        actor: &mut dyn ActorBody,
        step: Duration,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        self.session.timers.advance(step);

        while let Some(fired) = self.session.timers.pop_due() {
            match fired.event {
                TimerEvent::CountdownTick => {
                    let Session { pause, timers, .. } = &mut self.session;
                    match pause.on_timer(fired.handle, timers, actor) {
                        Some(CountdownStep::Remaining(remaining)) => {
                            events.push(GameEvent::CountdownTick { remaining })
                        }
                        Some(CountdownStep::Resumed) => events.push(GameEvent::Resumed),
                        None => {}
                    }
                }
                TimerEvent::Restart => {
                    self.restart(actor, events);
                    return true;
                }
            }
        }
        false
    }

    /// Shared by bounds exit and obstacle collision; the first trigger wins
    fn game_over(&mut self, actor: &mut dyn ActorBody, events: &mut Vec<GameEvent>) {
        if self.session.phase == GamePhase::GameOver {
            return;
        }
        let session = &mut self.session;
        session.phase = GamePhase::GameOver;
        actor.pause_world_motion();
        actor.set_tint(GAME_OVER_TINT);
        session.pause.cancel(&mut session.timers);

        let score = session.score.score();
        let best = session.score.on_game_over(&mut self.store);
        session.restart_timer = Some(
            session
                .timers
                .schedule_once(self.settings.restart_delay(), TimerEvent::Restart),
        );

        log::info!(
            "Game over after {} frames: score {}, best {}",
            session.frames,
            score,
            best
        );
        events.push(GameEvent::GameOver { score, best });
    }

    /// Replace the session wholesale and respawn the actor
    fn restart(&mut self, actor: &mut dyn ActorBody, events: &mut Vec<GameEvent>) {
        self.session.teardown();
        let index = self.session.index + 1;
        self.session = Session::new(&self.settings, &self.store, index);
        actor.respawn(self.settings.start_position());
        events.push(GameEvent::SessionRestarted { session: index });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::highscores::HIGHSCORE_KEY;
    use crate::persistence::MemoryStore;
    use crate::sim::actor::Flapper;
    use glam::Vec2;

    fn game() -> (Game<MemoryStore>, Flapper) {
        let settings = Settings {
            seed: 1234,
            ..Default::default()
        };
        let actor = Flapper::new(
            settings.start_position(),
            settings.world_height,
            settings.gravity,
        );
        (Game::new(settings, MemoryStore::new()).unwrap(), actor)
    }

    /// Scroll until the first `n` pairs are fully off-screen and the rest are not
    fn expire_pairs(game: &mut Game<MemoryStore>, n: usize) {
        let geometry = *game.session.field.geometry();
        let last = &game.session.field.obstacles()[(n - 1) * 2];
        let shift = last.pos.x + geometry.obstacle_size.x + 1.0;
        game.session.field.advance(shift / -geometry.velocity);
    }

    #[test]
    fn test_invalid_settings_refuse_to_start() {
        let settings = Settings {
            world_height: 100.0,
            ..Default::default()
        };
        assert!(Game::new(settings, MemoryStore::new()).is_err());
    }

    #[test]
    fn test_fresh_session() {
        let (game, _) = game();
        assert_eq!(game.score(), 0);
        assert_eq!(game.tier(), DifficultyTier::Easy);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.pause_state(), PauseState::Running);
        assert_eq!(game.session().field.obstacles().len(), PAIRS_IN_FIELD * 2);
    }

    #[test]
    fn test_flap_uses_tier_impulse() {
        let (mut game, mut actor) = game();
        let event = game.flap(&mut actor);
        assert_eq!(event, Some(GameEvent::Flapped { velocity: 300.0 }));
        assert_eq!(actor.vel.y, -300.0);
    }

    #[test]
    fn test_flap_dropped_while_paused_and_counting_down() {
        let (mut game, mut actor) = game();
        assert_eq!(
            game.pause(&mut actor),
            vec![
                GameEvent::Paused,
                GameEvent::OverlayLaunched { name: PAUSE_OVERLAY }
            ]
        );
        assert_eq!(game.flap(&mut actor), None);
        assert_eq!(actor.vel.y, 0.0);

        assert_eq!(game.resume(), vec![GameEvent::CountdownStarted { remaining: 3 }]);
        assert_eq!(game.flap(&mut actor), None);
        assert_eq!(actor.vel.y, 0.0);
    }

    #[test]
    fn test_world_frozen_while_paused() {
        let (mut game, mut actor) = game();
        game.pause(&mut actor);
        let before = game.session().field.obstacles()[0].pos;
        game.tick(&mut actor, 0.5);
        assert_eq!(game.session().field.obstacles()[0].pos, before);
    }

    #[test]
    fn test_countdown_resumes_after_three_seconds() {
        let (mut game, mut actor) = game();
        game.pause(&mut actor);
        game.resume();
        assert!(game.resume().is_empty());

        assert_eq!(game.tick(&mut actor, 1.0), vec![GameEvent::CountdownTick { remaining: 2 }]);
        assert_eq!(game.tick(&mut actor, 1.0), vec![GameEvent::CountdownTick { remaining: 1 }]);
        let events = game.tick(&mut actor, 1.0);
        assert_eq!(events.first(), Some(&GameEvent::Resumed));
        assert_eq!(game.pause_state(), PauseState::Running);
        assert!(!actor.is_frozen());
        assert!(game.flap(&mut actor).is_some());
    }

    #[test]
    fn test_leaving_bounds_is_game_over_once() {
        let (mut game, mut actor) = game();
        actor.pos.y = WORLD_HEIGHT - actor.size.y;

        let events = game.tick(&mut actor, SIM_DT);
        assert_eq!(events, vec![GameEvent::GameOver { score: 0, best: 0 }]);
        assert_eq!(actor.tint, Some(GAME_OVER_TINT));
        assert!(actor.is_frozen());

        // Collision in the same frame does not fire again
        assert!(game.on_collision(&mut actor).is_empty());
        assert!(game.tick(&mut actor, SIM_DT).is_empty());
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_touching_ceiling_is_game_over() {
        let (mut game, mut actor) = game();
        actor.pos.y = 0.0;
        let events = game.tick(&mut actor, SIM_DT);
        assert!(matches!(events.as_slice(), [GameEvent::GameOver { .. }]));
    }

    #[test]
    fn test_game_over_beats_recycling_in_same_tick() {
        let (mut game, mut actor) = game();
        expire_pairs(&mut game, 1);
        actor.pos.y = WORLD_HEIGHT;
        let events = game.tick(&mut actor, SIM_DT);
        assert_eq!(events, vec![GameEvent::GameOver { score: 0, best: 0 }]);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_recycling_scores() {
        let (mut game, mut actor) = game();
        expire_pairs(&mut game, PAIRS_IN_FIELD);
        let events = game.tick(&mut actor, SIM_DT);
        let scores: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ScoreChanged { score } => Some(*score),
                _ => None,
            })
            .collect();
        assert_eq!(scores, vec![1, 2, 3, 4]);
        assert_eq!(game.score(), 4);
    }

    #[test]
    fn test_restart_after_delay() {
        let (mut game, mut actor) = game();
        game.store.set(HIGHSCORE_KEY, "2").unwrap();
        expire_pairs(&mut game, PAIRS_IN_FIELD);
        game.tick(&mut actor, SIM_DT);
        assert_eq!(game.score(), 4);

        let events = game.on_collision(&mut actor);
        assert_eq!(events, vec![GameEvent::GameOver { score: 4, best: 4 }]);
        assert_eq!(game.store().get(HIGHSCORE_KEY).as_deref(), Some("4"));

        assert!(game.tick(&mut actor, 0.5).is_empty());
        let events = game.tick(&mut actor, 0.5);
        assert_eq!(events, vec![GameEvent::SessionRestarted { session: 1 }]);

        assert_eq!(game.score(), 0);
        assert_eq!(game.tier(), DifficultyTier::Easy);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.session().score.best_at_start(), 4);
        assert_eq!(actor.pos, Vec2::new(ACTOR_START_X, ACTOR_START_Y));
        assert_eq!(actor.tint, None);
        assert!(!actor.is_frozen());
        assert_eq!(game.session().timers.active_count(), 0);
    }

    #[test]
    fn test_restart_cancels_pending_countdown() {
        let (mut game, mut actor) = game();
        game.pause(&mut actor);
        game.resume();
        game.on_collision(&mut actor);
        assert_eq!(game.session().pause.timer(), None);

        let events = game.tick(&mut actor, 1.0);
        assert_eq!(events, vec![GameEvent::SessionRestarted { session: 1 }]);
        assert_eq!(game.pause_state(), PauseState::Running);
        assert_eq!(game.session().timers.active_count(), 0);
    }

    #[test]
    fn test_unusable_frame_steps_are_ignored() {
        let (mut game, mut actor) = game();
        let before: Vec<Vec2> = game.session().field.obstacles().iter().map(|o| o.pos).collect();

        for dt in [f32::NAN, f32::INFINITY, -SIM_DT, 0.0, 1.0e20] {
            assert!(game.tick(&mut actor, dt).is_empty());
        }
        let after: Vec<Vec2> = game.session().field.obstacles().iter().map(|o| o.pos).collect();
        assert_eq!(after, before);
        assert_eq!(game.session().frames, 0);
        assert_eq!(game.session().timers.now(), Duration::ZERO);

        // Regular frames afterwards still scroll and score
        for _ in 0..600 {
            game.tick(&mut actor, 0.1);
        }
        assert!(game.session().field.obstacles().iter().all(|o| o.pos.is_finite()));
        assert!(game.score() > 0);
        assert_eq!(game.session().frames, 600);
    }
}
