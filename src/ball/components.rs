//! Ball data types

use bevy::prelude::*;
use std::collections::VecDeque;

use crate::constants::TRAIL_LENGTH;

/// Bounded history of recent positions, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trail {
    points: VecDeque<Vec2>,
}

impl Trail {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Append a position, evicting the oldest once past `TRAIL_LENGTH`
    pub fn push(&mut self, point: Vec2) {
        self.points.push_back(point);
        while self.points.len() > TRAIL_LENGTH {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<Vec2> {
        self.points.back().copied()
    }
}

/// One bouncing point
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub position: Vec2,
    pub velocity: Vec2,
    pub trail: Trail,
    /// Set while the ball stays in penetrating contact with the boundary.
    /// A hit is only counted on the frame this flips to true.
    pub hit_wall: bool,
}

impl Ball {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            trail: Trail::new(),
            hit_wall: false,
        }
    }

    /// Magnitude of the velocity
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Marker for the mesh entity drawing ball `index` of the session
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallVisual(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_evicts_oldest() {
        let mut trail = Trail::new();
        for i in 0..(TRAIL_LENGTH + 10) {
            trail.push(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(trail.len(), TRAIL_LENGTH);
        assert_eq!(trail.iter().next().copied(), Some(Vec2::new(10.0, 0.0)));
        assert_eq!(
            trail.latest(),
            Some(Vec2::new((TRAIL_LENGTH + 9) as f32, 0.0))
        );
    }

    #[test]
    fn test_new_ball_is_clean() {
        let ball = Ball::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        assert!(ball.trail.is_empty());
        assert!(!ball.hit_wall);
        assert!((ball.speed() - 5.0).abs() < 1e-6);
    }
}
