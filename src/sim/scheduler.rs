//! Virtual-time timer queue
//!
//! Timers fire on the simulation clock, not the wall clock. The owner advances
//! the clock each frame and drains due timers with [`Scheduler::pop_due`],
//! which lets a handler cancel timers (including the one that just fired)
//! before later firings in the same frame are delivered.

use std::time::Duration;

/// Cancellation handle returned by every schedule call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<E> {
    pub handle: TimerHandle,
    pub event: E,
}

#[derive(Debug, Clone)]
struct Timer<E> {
    handle: TimerHandle,
    due: Duration,
    repeat: Option<Duration>,
    event: E,
}

#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    /// Time of the last delivered firing (or of the horizon once drained)
    now: Duration,
    /// How far the clock has been advanced
    horizon: Duration,
    next_id: u64,
    timers: Vec<Timer<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            horizon: Duration::ZERO,
            next_id: 1,
            timers: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    fn insert(&mut self, delay: Duration, repeat: Option<Duration>, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            handle,
            due: self.now.saturating_add(delay),
            repeat,
            event,
        });
        handle
    }

    /// Fire `event` once after `delay`
    pub fn schedule_once(&mut self, delay: Duration, event: E) -> TimerHandle {
        self.insert(delay, None, event)
    }

    /// Fire `event` every `interval`, first after one interval
    pub fn schedule_repeating(&mut self, interval: Duration, event: E) -> TimerHandle {
        // A zero interval would fire forever within a single frame
        let interval = interval.max(Duration::from_millis(1));
        self.insert(interval, Some(interval), event)
    }

    /// Returns false if the timer had already fired (one-shot) or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward; due timers are delivered by `pop_due`
    pub fn advance(&mut self, dt: Duration) {
        self.horizon = self.horizon.saturating_add(dt);
    }
}

impl<E: Copy> Scheduler<E> {
    /// Next timer due at or before the horizon, earliest first (ties by creation order)
    pub fn pop_due(&mut self) -> Option<Fired<E>> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= self.horizon)
            .min_by_key(|(_, t)| (t.due, t.handle.0))
            .map(|(i, _)| i);

        let Some(index) = index else {
            self.now = self.horizon;
            return None;
        };

        let timer = &mut self.timers[index];
        self.now = timer.due;
        let fired = Fired {
            handle: timer.handle,
            event: timer.event,
        };
        match timer.repeat {
            Some(interval) => timer.due = timer.due.saturating_add(interval),
            None => {
                self.timers.swap_remove(index);
            }
        }
        Some(fired)
    }
}
