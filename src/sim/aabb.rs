//! Axis-aligned bounding boxes
//!
//! Every collidable entity (ball, paddle, brick) is an unrotated rectangle.
//! Entities expose their geometry through the [`Aabb`] trait and the
//! [`intersects`] predicate does the rest; there is no entity hierarchy.

use glam::Vec2;

/// Axis-aligned bounding box capability
///
/// Anything with a top-left position and non-negative extents. Edge accessors
/// are derived; implementors only supply the three primitives.
pub trait Aabb {
    /// Top-left corner
    fn pos(&self) -> Vec2;
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn left(&self) -> f32 {
        self.pos().x
    }

    fn right(&self) -> f32 {
        self.pos().x + self.width()
    }

    fn top(&self) -> f32 {
        self.pos().y
    }

    fn bottom(&self) -> f32 {
        self.pos().y + self.height()
    }
}

/// Whether two boxes overlap
///
/// All four comparisons are strict: boxes that merely share an edge or a
/// corner do not intersect. Pure predicate, no side effects.
#[inline]
pub fn intersects(a: &impl Aabb, b: &impl Aabb) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}
