//! Collision tests for the shapes the mini-games use
//!
//! Circles (asteroids, bullets, ducks) and axis-aligned boxes (platforms,
//! hazards, the jumper). Everything here is pure and allocation-free.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Check overlap between two circles
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) < reach * reach
}

/// Axis-aligned box stored as center + half extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    /// Lower edge (y axis points up)
    pub fn bottom(&self) -> f32 {
        self.center.y - self.half.y
    }

    /// Upper edge (y axis points up)
    pub fn top(&self) -> f32 {
        self.center.y + self.half.y
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.bottom() < other.top()
            && self.top() > other.bottom()
    }

    /// Whether `self` (falling) lands on top of `surface` this step.
    ///
    /// Horizontal overlap is required, and the feet must have been at or above
    /// the surface before the step and at or below it after.
    pub fn lands_on(&self, previous_bottom: f32, surface: &Aabb) -> bool {
        let horizontal = self.left() < surface.right() && self.right() > surface.left();
        horizontal && previous_bottom >= surface.top() && self.bottom() <= surface.top()
    }
}
