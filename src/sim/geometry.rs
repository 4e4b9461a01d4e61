//! Axis-aligned rectangles and the overlap tests built on them
//!
//! Everything in the playfield is a box positioned by its top-left corner;
//! circles only appear as derived shapes (the box's inscribed circle).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, top-left corner plus positive extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `size` at `pos`
    pub fn square(pos: Vec2, size: f32) -> Self {
        Self::new(pos.x, pos.y, size, size)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict AABB intersection; touching edges do not count
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Intersection after growing both boxes' far edges by `padding`.
    ///
    /// Zero padding degenerates to [`Rect::intersects`].
    #[inline]
    pub fn overlaps_padded(&self, other: &Rect, padding: f32) -> bool {
        let x_overlap = self.x < other.right() + padding && self.right() + padding > other.x;
        let y_overlap = self.y < other.bottom() + padding && self.bottom() + padding > other.y;
        x_overlap && y_overlap
    }

    /// Area shared with `other` (0 when disjoint)
    pub fn overlap_area(&self, other: &Rect) -> f32 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w > 0.0 && h > 0.0 { w * h } else { 0.0 }
    }

    /// Point inside (or on the border of) the rectangle closest to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.x, self.right()), p.y.clamp(self.y, self.bottom()))
    }

    /// Same rectangle grown by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }
}

/// Penetration depth of `mover` into `obstacle` from each side.
///
/// Returned as `[left, right, top, bottom]`: how far the mover would have to
/// travel out through that face of the obstacle.
pub fn penetration_depths(mover: &Rect, obstacle: &Rect) -> [f32; 4] {
    [
        mover.right() - obstacle.x,
        obstacle.right() - mover.x,
        mover.bottom() - obstacle.y,
        obstacle.bottom() - mover.y,
    ]
}

/// Does a circle at `center` with `radius` touch `rect`?
///
/// Returns the vector from the closest rectangle point to the center when
/// it does.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> Option<Vec2> {
    let closest = rect.closest_point(center);
    let offset = center - closest;
    if offset.length() < radius {
        Some(offset)
    } else {
        None
    }
}

/// Circle–circle test between two boxes' inscribed circles (strict `<`)
pub fn circles_overlap(a: &Rect, b: &Rect) -> bool {
    let reach = a.width / 2.0 + b.width / 2.0;
    a.center().distance(b.center()) < reach
}
