//! Ball factory - random placement inside the boundary and random velocity

use bevy::prelude::*;
use rand::Rng;

use crate::arena::Boundary;
use crate::ball::components::Ball;
use crate::constants::SPAWN_MAX_ATTEMPTS;

/// Velocity with each component uniform in `[-speed, speed]`.
/// A non-positive speed yields a motionless ball.
pub fn random_velocity(speed: f32, rng: &mut impl Rng) -> Vec2 {
    if !(speed > 0.0) {
        return Vec2::ZERO;
    }
    Vec2::new(
        rng.gen_range(-speed..=speed),
        rng.gen_range(-speed..=speed),
    )
}

/// Uniform point whose ball fits inside the boundary.
///
/// Rejection-samples the bounding square of the reachable disc. After
/// `SPAWN_MAX_ATTEMPTS` misses (or when the boundary is too small to
/// hold a ball at all) the center is used instead.
pub fn random_position(boundary: &Boundary, rng: &mut impl Rng) -> Vec2 {
    let reach = boundary.reach();
    if !(reach > 0.0) {
        return boundary.center;
    }

    let min = boundary.center - Vec2::splat(reach);
    let max = boundary.center + Vec2::splat(reach);

    for _ in 0..SPAWN_MAX_ATTEMPTS {
        let candidate = Vec2::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y));
        if boundary.contains_ball(candidate) {
            return candidate;
        }
    }

    warn!(
        "No spawn point found in {} attempts, using boundary center",
        SPAWN_MAX_ATTEMPTS
    );
    boundary.center
}

/// Create a fresh ball: random position inside `boundary`, random velocity
/// bounded by `speed`, empty trail, not in wall contact.
pub fn spawn_ball(boundary: &Boundary, speed: f32, rng: &mut impl Rng) -> Ball {
    let position = random_position(boundary, rng);
    let velocity = random_velocity(speed, rng);
    Ball::new(position, velocity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BALL_RADIUS;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_spawned_balls_are_contained() {
        let mut rng = StdRng::seed_from_u64(7);
        let boundary = Boundary::new(Vec2::new(640.0, 400.0), 400.0);
        for _ in 0..2000 {
            let ball = spawn_ball(&boundary, 5.0, &mut rng);
            let dist = ball.position.distance(boundary.center);
            assert!(dist <= boundary.radius - BALL_RADIUS + 1e-3);
            assert!(ball.trail.is_empty());
            assert!(!ball.hit_wall);
        }
    }

    #[test]
    fn test_velocity_within_speed_bound() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let v = random_velocity(3.0, &mut rng);
            assert!(v.x.abs() <= 3.0 && v.y.abs() <= 3.0);
        }
    }

    #[test]
    fn test_zero_speed_is_motionless() {
        let mut rng = StdRng::seed_from_u64(1);
        let boundary = Boundary::new(Vec2::ZERO, 100.0);
        let ball = spawn_ball(&boundary, 0.0, &mut rng);
        assert_eq!(ball.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_tiny_boundary_falls_back_to_center() {
        let mut rng = StdRng::seed_from_u64(3);
        let boundary = Boundary::new(Vec2::new(5.0, 5.0), BALL_RADIUS);
        assert_eq!(random_position(&boundary, &mut rng), Vec2::new(5.0, 5.0));

        let smaller = Boundary::new(Vec2::new(5.0, 5.0), 1.0);
        assert_eq!(random_position(&smaller, &mut rng), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_positions_spread_over_disc() {
        // All four quadrants get used
        let mut rng = StdRng::seed_from_u64(42);
        let boundary = Boundary::new(Vec2::ZERO, 100.0);
        let mut quadrants = [false; 4];
        for _ in 0..200 {
            let p = random_position(&boundary, &mut rng);
            let q = match (p.x >= 0.0, p.y >= 0.0) {
                (true, true) => 0,
                (false, true) => 1,
                (false, false) => 2,
                (true, false) => 3,
            };
            quadrants[q] = true;
        }
        assert!(quadrants.iter().all(|&q| q));
    }
}
