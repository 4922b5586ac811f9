//! Axis-aligned rectangle geometry
//!
//! Every entity footprint in the game is an AABB; hit tests take a signed
//! padding so individual interactions can be stricter (negative, must
//! visibly overlap) or more forgiving (positive, e.g. power-up pickup).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Fallback hitbox edge for degenerate sizes
const MIN_HITBOX: f32 = 4.0;

/// An axis-aligned rectangle: top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        self.pos + self.effective_size() * 0.5
    }

    /// Size with non-finite or non-positive components replaced by a minimal
    /// hitbox, so a malformed entity degrades instead of breaking a tick.
    fn effective_size(&self) -> Vec2 {
        let fix = |v: f32| if v.is_finite() && v > 0.0 { v } else { MIN_HITBOX };
        Vec2::new(fix(self.size.x), fix(self.size.y))
    }

    /// AABB overlap test with signed padding applied to `other`'s extent.
    /// Symmetric in its arguments for any padding.
    pub fn overlaps(&self, other: &Rect, padding: f32) -> bool {
        let a = self.effective_size();
        let b = other.effective_size();
        self.pos.x < other.pos.x + b.x + padding
            && self.pos.x + a.x > other.pos.x - padding
            && self.pos.y < other.pos.y + b.y + padding
            && self.pos.y + a.y > other.pos.y - padding
    }

    /// Clamp the rectangle so it lies fully inside `bounds` minus `margin`
    pub fn clamp_into(&mut self, bounds: Vec2, margin: f32) {
        let size = self.effective_size();
        self.pos.x = self.pos.x.clamp(margin, (bounds.x - size.x - margin).max(margin));
        self.pos.y = self.pos.y.clamp(margin, (bounds.y - size.y - margin).max(margin));
    }

    /// True once the rectangle has fallen below the bottom edge
    pub fn below_screen(&self, bounds: Vec2) -> bool {
        self.pos.y > bounds.y
    }

    /// True when outside the bounds with a grace band on every side
    pub fn off_screen(&self, bounds: Vec2, grace: f32) -> bool {
        let size = self.effective_size();
        self.pos.y + size.y < -grace
            || self.pos.y > bounds.y + grace
            || self.pos.x + size.x < -grace
            || self.pos.x > bounds.x + grace
    }
}
