//! Pause / resume countdown state machine
//!
//! Running -> Paused on pause, Paused -> CountingDown on resume, and back to
//! Running once the countdown reaches zero. Flaps are only honored while
//! Running.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::actor::ActorBody;
use super::scheduler::{Scheduler, TimerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseState {
    Running,
    Paused,
    CountingDown { remaining: u32 },
}

/// What a countdown tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Still counting; show this number
    Remaining(u32),
    /// Countdown finished, play resumed
    Resumed,
}

#[derive(Debug, Clone)]
pub struct PauseCountdown<E> {
    state: PauseState,
    timer: Option<TimerHandle>,
    count_from: u32,
    interval: Duration,
    tick_event: E,
}

impl<E: Copy> PauseCountdown<E> {
    /// `tick_event` is what the countdown timer fires on the scheduler
    pub fn new(count_from: u32, interval: Duration, tick_event: E) -> Self {
        Self {
            state: PauseState::Running,
            timer: None,
            count_from,
            interval,
            tick_event,
        }
    }

    pub fn state(&self) -> PauseState {
        self.state
    }

    pub fn accepts_impulse(&self) -> bool {
        self.state == PauseState::Running
    }

    /// Handle of the running countdown timer, if any
    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    /// Freeze the world. Returns false (and does nothing) unless Running.
    pub fn pause(&mut self, actor: &mut dyn ActorBody) -> bool {
        if self.state != PauseState::Running {
            return false;
        }
        actor.pause_world_motion();
        self.state = PauseState::Paused;
        log::info!("Paused");
        true
    }

    /// Start the countdown. Returns the first number to show, or None when
    /// not Paused (a second resume never starts a second timer).
    pub fn resume(&mut self, scheduler: &mut Scheduler<E>) -> Option<u32> {
        if self.state != PauseState::Paused {
            return None;
        }
        self.timer = Some(scheduler.schedule_repeating(self.interval, self.tick_event));
        self.state = PauseState::CountingDown {
            remaining: self.count_from,
        };
        log::debug!("Countdown started from {}", self.count_from);
        Some(self.count_from)
    }

    /// Feed a fired timer. Timers other than ours are ignored.
    pub fn on_timer(
        &mut self,
        handle: TimerHandle,
        scheduler: &mut Scheduler<E>,
        actor: &mut dyn ActorBody,
    ) -> Option<CountdownStep> {
        if self.timer != Some(handle) {
            return None;
        }
        let PauseState::CountingDown { remaining } = self.state else {
            return None;
        };

        let remaining = remaining.saturating_sub(1);
        if remaining > 0 {
            self.state = PauseState::CountingDown { remaining };
            return Some(CountdownStep::Remaining(remaining));
        }

        self.cancel(scheduler);
        self.state = PauseState::Running;
        actor.resume_world_motion();
        log::info!("Resumed");
        Some(CountdownStep::Resumed)
    }

    /// Drop the countdown timer, if one is running
    pub fn cancel(&mut self, scheduler: &mut Scheduler<E>) {
        if let Some(handle) = self.timer.take() {
            scheduler.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::Flapper;
    use glam::Vec2;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Tick;

    fn setup() -> (PauseCountdown<Tick>, Scheduler<Tick>, Flapper) {
        (
            PauseCountdown::new(3, Duration::from_millis(1000), Tick),
            Scheduler::new(),
            Flapper::new(Vec2::new(80.0, 300.0), 600.0, 600.0),
        )
    }

    fn run(
        pc: &mut PauseCountdown<Tick>,
        s: &mut Scheduler<Tick>,
        actor: &mut Flapper,
        ms: u64,
    ) -> Vec<CountdownStep> {
        s.advance(Duration::from_millis(ms));
        let mut steps = Vec::new();
        while let Some(fired) = s.pop_due() {
            if let Some(step) = pc.on_timer(fired.handle, s, actor) {
                steps.push(step);
            }
        }
        steps
    }

    #[test]
    fn test_full_cycle() {
        let (mut pc, mut s, mut actor) = setup();
        assert!(pc.pause(&mut actor));
        assert!(actor.is_frozen());
        assert_eq!(pc.state(), PauseState::Paused);

        assert_eq!(pc.resume(&mut s), Some(3));
        assert_eq!(pc.state(), PauseState::CountingDown { remaining: 3 });
        assert!(!pc.accepts_impulse());

        assert_eq!(run(&mut pc, &mut s, &mut actor, 1000), vec![CountdownStep::Remaining(2)]);
        assert_eq!(run(&mut pc, &mut s, &mut actor, 1000), vec![CountdownStep::Remaining(1)]);
        assert!(actor.is_frozen());
        assert_eq!(run(&mut pc, &mut s, &mut actor, 1000), vec![CountdownStep::Resumed]);

        assert_eq!(pc.state(), PauseState::Running);
        assert!(pc.accepts_impulse());
        assert!(!actor.is_frozen());
        assert_eq!(s.active_count(), 0);
        assert!(pc.timer().is_none());
    }

    #[test]
    fn test_double_resume_single_timer() {
        let (mut pc, mut s, mut actor) = setup();
        pc.pause(&mut actor);
        assert_eq!(pc.resume(&mut s), Some(3));
        assert_eq!(pc.resume(&mut s), None);
        assert_eq!(s.active_count(), 1);

        // One decrement per second, not two
        assert_eq!(run(&mut pc, &mut s, &mut actor, 1000), vec![CountdownStep::Remaining(2)]);
    }

    #[test]
    fn test_large_step_stops_at_resume() {
        let (mut pc, mut s, mut actor) = setup();
        pc.pause(&mut actor);
        pc.resume(&mut s);
        let steps = run(&mut pc, &mut s, &mut actor, 10_000);
        assert_eq!(
            steps,
            vec![
                CountdownStep::Remaining(2),
                CountdownStep::Remaining(1),
                CountdownStep::Resumed
            ]
        );
        assert_eq!(s.active_count(), 0);
    }

    #[test]
    fn test_resume_without_pause_is_noop() {
        let (mut pc, mut s, _) = setup();
        assert_eq!(pc.resume(&mut s), None);
        assert_eq!(s.active_count(), 0);
    }

    #[test]
    fn test_pause_while_counting_down_ignored() {
        let (mut pc, mut s, mut actor) = setup();
        pc.pause(&mut actor);
        pc.resume(&mut s);
        assert!(!pc.pause(&mut actor));
        assert_eq!(pc.state(), PauseState::CountingDown { remaining: 3 });
    }
}
