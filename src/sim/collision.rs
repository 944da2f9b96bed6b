//! Collision footprints
//!
//! Everything in the playfield collides as an axis-aligned box: the craft, a
//! token, and each of the two beams of a hazard pair. Boxes that merely touch
//! along an edge do not overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in playfield coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rectangle from its top-left corner and size
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
        }
    }

    /// Square centered on `center` with the given half-width
    pub fn centered(center: Vec2, half: f32) -> Self {
        Self {
            min: center - Vec2::splat(half),
            max: center + Vec2::splat(half),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// True if either dimension has collapsed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Strict overlap test (shared edges don't count, empty boxes never hit)
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}
