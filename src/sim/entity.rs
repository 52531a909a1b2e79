//! Shared entity building blocks
//!
//! Games keep their entities as plain tagged structs (`kind` + fields) and run
//! them through these helpers instead of attaching behavior to each instance.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::wrap_coord;

/// Axis-aligned play area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Play area anchored at the origin
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Grow (or shrink, for negative margins) on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self::new(self.min - Vec2::splat(margin), self.max + Vec2::splat(margin))
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    /// Wrap both axes into the area
    pub fn wrap(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            wrap_coord(pos.x, self.min.x, self.max.x),
            wrap_coord(pos.y, self.min.y, self.max.y),
        )
    }

    /// Wrap the horizontal axis only (side-scrolling wrap)
    pub fn wrap_x(&self, pos: Vec2) -> Vec2 {
        Vec2::new(wrap_coord(pos.x, self.min.x, self.max.x), pos.y)
    }
}

/// Countdown for entities that expire (bullets, timers)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lifetime {
    pub age: f32,
    pub limit: f32,
}

impl Lifetime {
    pub fn new(limit: f32) -> Self {
        Self { age: 0.0, limit }
    }

    /// Age by `dt`; returns true once the limit is reached
    pub fn tick(&mut self, dt: f32) -> bool {
        self.age += dt;
        self.expired()
    }

    pub fn expired(&self) -> bool {
        self.age >= self.limit
    }

    /// Fraction of the lifetime used, 0..=1
    pub fn progress(&self) -> f32 {
        if self.limit <= 0.0 {
            1.0
        } else {
            (self.age / self.limit).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_wrap_both_axes() {
        let bounds = Bounds::from_size(800.0, 480.0);
        let wrapped = bounds.wrap(Vec2::new(-5.0, 500.0));
        assert!((wrapped.x - 795.0).abs() < 1e-3);
        assert!((wrapped.y - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_bounds_expand() {
        let bounds = Bounds::from_size(100.0, 100.0).expand(10.0);
        assert_eq!(bounds.min, Vec2::splat(-10.0));
        assert_eq!(bounds.max, Vec2::splat(110.0));
        assert!(bounds.contains(Vec2::new(-5.0, 105.0)));
    }

    #[test]
    fn test_wrap_x_leaves_y() {
        let bounds = Bounds::from_size(320.0, 480.0);
        let wrapped = bounds.wrap_x(Vec2::new(330.0, 9000.0));
        assert!((wrapped.x - 10.0).abs() < 1e-3);
        assert_eq!(wrapped.y, 9000.0);
    }

    #[test]
    fn test_lifetime() {
        let mut life = Lifetime::new(1.0);
        assert!(!life.tick(0.5));
        assert!((life.progress() - 0.5).abs() < 1e-6);
        assert!(life.tick(0.5));
        assert!(life.expired());
    }
}
