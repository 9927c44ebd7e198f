//! Collision detection for axis-aligned rects and circles
//!
//! Everything in the level is either a rect (player, platforms, hazards) or a
//! circle (orbs, wraiths). World coordinates have y pointing down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Clamp `value` into `[min, max]`.
///
/// Unlike `f32::clamp` this never panics: when `min > max` (a canvas narrower
/// than the player) the result is `max`.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Axis-aligned rectangle, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// True if the horizontal spans overlap (open intervals)
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x
    }
}

/// A circle (orb or wraith body)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Strict rect/rect overlap; touching edges do not count
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Circle/rect overlap via the closest point on the rect.
///
/// A circle exactly tangent to the rect counts as a hit.
pub fn circle_rect_overlap(circle: &Circle, rect: &Rect) -> bool {
    let closest = Vec2::new(
        clamp(circle.center.x, rect.x, rect.right()),
        clamp(circle.center.y, rect.y, rect.bottom()),
    );
    circle.center.distance_squared(closest) <= circle.radius * circle.radius
}

/// Swept landing test against the top edge of a platform.
///
/// `prev_bottom` is the mover's bottom edge at the start of the tick and
/// `mover` its rect after integration. A landing requires crossing (or
/// touching) the top edge this tick, horizontal overlap, and a non-negative
/// vertical velocity (falling or resting).
pub fn lands_on(prev_bottom: f32, mover: &Rect, vel_y: f32, platform: &Rect) -> bool {
    prev_bottom <= platform.y
        && mover.bottom() >= platform.y
        && mover.overlaps_x(platform)
        && vel_y >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_never_panics() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-3.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(12.0, 0.0, 10.0), 10.0);
        // Inverted bounds resolve to max
        assert_eq!(clamp(5.0, 8.0, 2.0), 2.0);
    }

    #[test]
    fn test_rects_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rects_overlap(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Touching edges only
        assert!(!rects_overlap(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!rects_overlap(&a, &Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(!rects_overlap(&a, &Rect::new(30.0, 30.0, 5.0, 5.0)));
    }

    #[test]
    fn test_circle_rect_overlap() {
        let rect = Rect::new(100.0, 100.0, 32.0, 46.0);

        // Center inside
        assert!(circle_rect_overlap(&Circle::new(Vec2::new(110.0, 110.0), 4.0), &rect));
        // Tangent to the left edge
        assert!(circle_rect_overlap(&Circle::new(Vec2::new(88.0, 120.0), 12.0), &rect));
        // Just out of reach of the corner
        assert!(!circle_rect_overlap(&Circle::new(Vec2::new(90.0, 90.0), 12.0), &rect));
        // Near the corner, inside the radius
        assert!(circle_rect_overlap(&Circle::new(Vec2::new(95.0, 95.0), 12.0), &rect));
    }

    #[test]
    fn test_lands_on_crossing_top_edge() {
        let platform = Rect::new(580.0, 300.0, 160.0, 16.0);
        // Previous bottom 295, new bottom 305
        let mover = Rect::new(600.0, 305.0 - 46.0, 32.0, 46.0);
        assert!(lands_on(295.0, &mover, 120.0, &platform));
        // Rising through the platform does not land
        assert!(!lands_on(295.0, &mover, -50.0, &platform));
        // Already below the top edge last tick
        assert!(!lands_on(301.0, &mover, 120.0, &platform));
        // No horizontal overlap
        let beside = Rect::new(400.0, 305.0 - 46.0, 32.0, 46.0);
        assert!(!lands_on(295.0, &beside, 120.0, &platform));
    }

    #[test]
    fn test_lands_on_resting() {
        // Standing exactly on top with zero velocity keeps landing each tick
        let platform = Rect::new(0.0, 380.0, 800.0, 40.0);
        let mover = Rect::new(100.0, 380.0 - 46.0, 32.0, 46.0);
        assert!(lands_on(380.0, &mover, 0.0, &platform));
    }
}
