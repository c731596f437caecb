//! Recycled obstacle field
//!
//! A fixed pool of obstacle pairs scrolls left. Obstacles that leave the
//! screen are picked up two at a time, placed to the right of the rightmost
//! obstacle with fresh random geometry, and reported as recycling events.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::Bounds;
use super::difficulty::TierParams;

/// Which half of a pair an obstacle is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Hangs from above; `pos` is its bottom-left corner
    Upper,
    /// Stands from below; `pos` is its top-left corner
    Lower,
}

/// One half of an obstacle pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub orientation: Orientation,
    /// Pool index of the other half of this pair
    pub partner: usize,
    pub size: Vec2,
}

impl Obstacle {
    pub fn bounds(&self) -> Bounds {
        let top = match self.orientation {
            Orientation::Upper => self.pos.y - self.size.y,
            Orientation::Lower => self.pos.y,
        };
        Bounds::from_top_left(Vec2::new(self.pos.x, top), self.size)
    }

    /// Fully past the left world edge
    pub fn is_offscreen(&self) -> bool {
        self.pos.x + self.size.x <= 0.0
    }
}

/// Emitted once per two recycled obstacles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecycleEvent {
    pub upper: usize,
    pub lower: usize,
    /// Where the re-placed pair landed
    pub x: f32,
    pub opening: i32,
    pub spacing: i32,
}

/// Geometry the field needs to place pairs
#[derive(Debug, Clone, Copy)]
pub struct FieldGeometry {
    pub world_height: f32,
    pub margin: i32,
    pub velocity: f32,
    pub obstacle_size: Vec2,
}

/// Owns every obstacle for the session
#[derive(Debug, Clone)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    geometry: FieldGeometry,
}

impl ObstacleField {
    /// Build `pairs` pairs and place them left to right with `tier`
    pub fn new<R: Rng>(
        pairs: usize,
        geometry: FieldGeometry,
        tier: &TierParams,
        rng: &mut R,
    ) -> Self {
        let mut obstacles = Vec::with_capacity(pairs * 2);
        for i in 0..pairs {
            let upper = i * 2;
            let lower = upper + 1;
            let halves = [(Orientation::Upper, lower), (Orientation::Lower, upper)];
            for (orientation, partner) in halves {
                obstacles.push(Obstacle {
                    pos: Vec2::ZERO,
                    orientation,
                    partner,
                    size: geometry.obstacle_size,
                });
            }
        }

        let mut field = Self {
            obstacles,
            geometry,
        };
        for i in 0..pairs {
            field.place_pair(i * 2, i * 2 + 1, tier, rng);
        }
        field
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn geometry(&self) -> &FieldGeometry {
        &self.geometry
    }

    /// Largest x over all obstacles, never below 0
    pub fn rightmost_x(&self) -> f32 {
        self.obstacles.iter().fold(0.0_f32, |max, o| max.max(o.pos.x))
    }

    /// Place two obstacles as one pair to the right of everything else.
    ///
    /// Returns `(x, opening, spacing)` of the placed pair.
    pub fn place_pair<R: Rng>(
        &mut self,
        upper: usize,
        lower: usize,
        tier: &TierParams,
        rng: &mut R,
    ) -> (f32, i32, i32) {
        let margin = self.geometry.margin;
        let opening = rng.random_range(tier.opening.min..=tier.opening.max);
        // Validated tiers always leave at least one anchor position
        let anchor_max = (self.geometry.world_height as i32 - margin - opening).max(margin);
        let anchor = rng.random_range(margin..=anchor_max);
        let spacing = rng.random_range(tier.spacing.min..=tier.spacing.max);
        let x = spacing as f32 + self.rightmost_x();

        let top = &mut self.obstacles[upper];
        top.pos = Vec2::new(x, anchor as f32);
        top.orientation = Orientation::Upper;
        top.partner = lower;

        let bottom = &mut self.obstacles[lower];
        bottom.pos = Vec2::new(x, (anchor + opening) as f32);
        bottom.orientation = Orientation::Lower;
        bottom.partner = upper;

        log::debug!(
            "Placed pair ({}, {}) at x={} anchor={} opening={} spacing={}",
            upper,
            lower,
            x,
            anchor,
            opening,
            spacing
        );
        (x, opening, spacing)
    }

    /// Scroll every obstacle by the field velocity
    pub fn advance(&mut self, dt: f32) {
        let dx = self.geometry.velocity * dt;
        for obstacle in &mut self.obstacles {
            obstacle.pos.x += dx;
        }
    }

    /// Re-place off-screen obstacles two at a time, in pool order.
    ///
    /// `tier` parameterizes the first placement; `on_recycled` sees each event
    /// and returns the parameters for the next one. Returns the event count.
    pub fn recycle<R, F>(&mut self, rng: &mut R, tier: TierParams, mut on_recycled: F) -> usize
    where
        R: Rng,
        F: FnMut(RecycleEvent) -> TierParams,
    {
        let mut tier = tier;
        let mut pending: Option<usize> = None;
        let mut events = 0;

        for i in 0..self.obstacles.len() {
            if !self.obstacles[i].is_offscreen() {
                continue;
            }
            match pending.take() {
                None => pending = Some(i),
                Some(first) => {
                    let (x, opening, spacing) = self.place_pair(first, i, &tier, rng);
                    events += 1;
                    tier = on_recycled(RecycleEvent {
                        upper: first,
                        lower: i,
                        x,
                        opening,
                        spacing,
                    });
                }
            }
        }

        events
    }

    /// Whether any obstacle overlaps `bounds`
    pub fn overlapping(&self, bounds: &Bounds) -> bool {
        self.obstacles.iter().any(|o| o.bounds().intersects(bounds))
    }

    /// Nearest pair whose right edge is still ahead of `x`, as `(x, gap_top, gap_bottom)`
    pub fn next_gap(&self, x: f32) -> Option<(f32, f32, f32)> {
        self.obstacles
            .iter()
            .filter(|o| o.orientation == Orientation::Upper && o.pos.x + o.size.x > x)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
            .map(|o| (o.pos.x, o.pos.y, self.obstacles[o.partner].pos.y))
    }
}
