//! Intersection Predicates
//!
//! Stateless overlap tests used by the per-frame entity-entity collision
//! phase. All tests are discrete (no sweeping) and inclusive at the
//! boundary: touching shapes count as intersecting.
//!
//! Rectangles are axis-aligned and given as center + full width/height.

use crate::math::vec2::Vec2;

/// Check if a point lies inside a circle.
#[inline]
pub fn point_in_circle(p: Vec2, center: Vec2, radius: f32) -> bool {
    p.distance_squared(center) <= radius * radius
}

/// Check if a point lies inside an axis-aligned rectangle.
#[inline]
pub fn point_in_rect(p: Vec2, center: Vec2, width: f32, height: f32) -> bool {
    let hw = width / 2.0;
    let hh = height / 2.0;
    p.x >= center.x - hw && p.x <= center.x + hw && p.y >= center.y - hh && p.y <= center.y + hh
}

/// Check if two circles overlap.
#[inline]
pub fn circle_circle(c0: Vec2, r0: f32, c1: Vec2, r1: f32) -> bool {
    let combined = r0 + r1;
    c0.distance_squared(c1) <= combined * combined
}

/// Check if two axis-aligned rectangles overlap (separating-axis test).
#[inline]
pub fn rect_rect(c0: Vec2, w0: f32, h0: f32, c1: Vec2, w1: f32, h1: f32) -> bool {
    !(c0.x - w0 / 2.0 > c1.x + w1 / 2.0
        || c1.x - w1 / 2.0 > c0.x + w0 / 2.0
        || c0.y - h0 / 2.0 > c1.y + h1 / 2.0
        || c1.y - h1 / 2.0 > c0.y + h0 / 2.0)
}

/// Check if a circle overlaps an axis-aligned rectangle.
///
/// Clamps the circle center to the rectangle extents to find the closest
/// point, then runs the point-circle test against it.
#[inline]
pub fn circle_rect(center: Vec2, radius: f32, rect: Vec2, width: f32, height: f32) -> bool {
    let hw = width / 2.0;
    let hh = height / 2.0;
    let closest = Vec2::new(
        center.x.clamp(rect.x - hw, rect.x + hw),
        center.y.clamp(rect.y - hh, rect.y + hh),
    );
    point_in_circle(closest, center, radius)
}

// =============================================================================
// TESTS
// =============================================================================
