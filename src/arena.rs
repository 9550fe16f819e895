//! Circular boundary the balls are confined to

use bevy::prelude::*;

use crate::constants::BALL_RADIUS;

/// Circle defined in canvas space (origin top-left, +y down).
///
/// Derived from the viewport and replaced wholesale on resize; balls are
/// always judged against the current value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub center: Vec2,
    pub radius: f32,
}

impl Boundary {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Boundary inscribed in a viewport: centered, radius = half the shorter side.
    ///
    /// Returns `None` when either dimension is not positive (minimized window).
    pub fn from_viewport(width: f32, height: f32) -> Option<Self> {
        if !(width > 0.0 && height > 0.0) {
            return None;
        }
        Some(Self {
            center: Vec2::new(width / 2.0, height / 2.0),
            radius: width.min(height) / 2.0,
        })
    }

    /// Largest distance from center a ball's center may sit at.
    pub fn reach(&self) -> f32 {
        self.radius - BALL_RADIUS
    }

    /// Signed distance by which a ball's edge crosses the boundary.
    /// Positive means the ball pokes outside.
    pub fn penetration(&self, position: Vec2) -> f32 {
        position.distance(self.center) + BALL_RADIUS - self.radius
    }

    /// True when a ball at `position` fits entirely inside.
    pub fn contains_ball(&self, position: Vec2) -> bool {
        self.penetration(position) <= 0.0
    }

    /// Viewport size this boundary is inscribed in, assuming it came from
    /// `from_viewport` (used to map canvas to world space).
    pub fn viewport(&self) -> Vec2 {
        self.center * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_viewport_uses_shorter_side() {
        let b = Boundary::from_viewport(800.0, 600.0).unwrap();
        assert_eq!(b.center, Vec2::new(400.0, 300.0));
        assert_eq!(b.radius, 300.0);

        let tall = Boundary::from_viewport(400.0, 1000.0).unwrap();
        assert_eq!(tall.radius, 200.0);
    }

    #[test]
    fn test_from_viewport_rejects_empty() {
        assert!(Boundary::from_viewport(0.0, 600.0).is_none());
        assert!(Boundary::from_viewport(800.0, -1.0).is_none());
        assert!(Boundary::from_viewport(f32::NAN, 600.0).is_none());
    }

    #[test]
    fn test_penetration_sign() {
        let b = Boundary::new(Vec2::ZERO, 100.0);
        assert_eq!(b.penetration(Vec2::new(103.0, 0.0)), 6.0);
        assert_eq!(b.penetration(Vec2::new(97.0, 0.0)), 0.0);
        assert!(b.penetration(Vec2::new(10.0, 10.0)) < 0.0);
        assert!(b.contains_ball(Vec2::new(97.0, 0.0)));
        assert!(!b.contains_ball(Vec2::new(0.0, -98.0)));
    }
}
