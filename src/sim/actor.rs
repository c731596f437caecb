//! The controllable actor and its physics collaborator interface
//!
//! The game loop only talks to the actor through [`ActorBody`]. [`Flapper`] is
//! a small kinematic body that satisfies it for headless runs and tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned bounds in world units (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Bounds {
    /// Bounds of a rectangle from its top-left corner and size
    pub fn from_top_left(pos: Vec2, size: Vec2) -> Self {
        Self {
            top: pos.y,
            bottom: pos.y + size.y,
            left: pos.x,
            right: pos.x + size.x,
        }
    }

    /// Strict overlap; touching edges do not count
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

/// Physics/actor collaborator driven by the game loop
pub trait ActorBody {
    fn bounds(&self) -> Bounds;
    /// Set the upward velocity (magnitude, positive = up)
    fn apply_impulse(&mut self, velocity: f32);
    fn set_tint(&mut self, color: u32);
    fn pause_world_motion(&mut self);
    fn resume_world_motion(&mut self);
    /// Reset the actor for a fresh session
    fn respawn(&mut self, pos: Vec2);
}

/// Kinematic actor: constant gravity, clamped to the world's vertical bounds
#[derive(Debug, Clone)]
pub struct Flapper {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub gravity: f32,
    pub tint: Option<u32>,
    world_height: f32,
    frozen: bool,
}

impl Flapper {
    pub fn new(start: Vec2, world_height: f32, gravity: f32) -> Self {
        Self {
            pos: start,
            vel: Vec2::ZERO,
            size: Vec2::new(ACTOR_WIDTH, ACTOR_HEIGHT),
            gravity,
            tint: None,
            world_height,
            frozen: false,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Integrate one step of motion
    pub fn step(&mut self, dt: f32) {
        if self.frozen {
            return;
        }
        self.vel.y += self.gravity * dt;
        self.pos += self.vel * dt;

        // Collide with world bounds
        let max_y = self.world_height - self.size.y;
        if self.pos.y <= 0.0 {
            self.pos.y = 0.0;
            self.vel.y = 0.0;
        } else if self.pos.y >= max_y {
            self.pos.y = max_y;
            self.vel.y = 0.0;
        }
    }
}

impl ActorBody for Flapper {
    fn bounds(&self) -> Bounds {
        Bounds::from_top_left(self.pos, self.size)
    }

    fn apply_impulse(&mut self, velocity: f32) {
        self.vel.y = -velocity;
    }

    fn set_tint(&mut self, color: u32) {
        self.tint = Some(color);
    }

    fn pause_world_motion(&mut self) {
        self.frozen = true;
    }

    fn resume_world_motion(&mut self) {
        self.frozen = false;
    }

    fn respawn(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.tint = None;
        self.frozen = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falls_and_clamps_to_floor() {
        let mut actor = Flapper::new(Vec2::new(80.0, 300.0), 600.0, GRAVITY);
        for _ in 0..600 {
            actor.step(SIM_DT);
        }
        assert_eq!(actor.bounds().bottom, 600.0);
        assert_eq!(actor.vel.y, 0.0);
    }

    #[test]
    fn test_impulse_moves_up() {
        let mut actor = Flapper::new(Vec2::new(80.0, 300.0), 600.0, GRAVITY);
        actor.apply_impulse(300.0);
        actor.step(SIM_DT);
        assert!(actor.pos.y < 300.0);
    }

    #[test]
    fn test_frozen_actor_does_not_move() {
        let mut actor = Flapper::new(Vec2::new(80.0, 300.0), 600.0, GRAVITY);
        actor.pause_world_motion();
        actor.step(1.0);
        assert_eq!(actor.pos, Vec2::new(80.0, 300.0));
    }

    #[test]
    fn test_bounds_intersection() {
        let a = Bounds::from_top_left(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Bounds::from_top_left(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        let c = Bounds::from_top_left(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
