//! Ball physics - integration, boundary reflection, trail upkeep

use bevy::prelude::*;
use rand::Rng;

use crate::arena::Boundary;
use crate::ball::components::Ball;
use crate::ball::spawning::spawn_ball;

/// A counted collision episode start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    /// Index of the ball that hit, in population order
    pub ball: usize,
    /// Position after correction
    pub position: Vec2,
}

/// Outcome of one stepper call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub hits: u32,
    pub wall_hits: Vec<WallHit>,
}

/// Mirror `velocity` across the tangent whose unit normal is `normal`.
/// Lossless: the magnitude is unchanged.
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Outward unit normal at `position`. Falls back to +X at the exact center
/// so no NaN reaches position or velocity.
pub fn boundary_normal(position: Vec2, boundary: &Boundary) -> Vec2 {
    let offset = position - boundary.center;
    let distance = offset.length();
    if distance > 0.0 && distance.is_finite() {
        offset / distance
    } else {
        Vec2::X
    }
}

/// Push a penetrating ball back inside and bounce it.
/// Returns true if the ball was penetrating.
pub fn resolve_boundary_contact(ball: &mut Ball, boundary: &Boundary) -> bool {
    let penetration = boundary.penetration(ball.position);
    if !(penetration > 0.0) {
        return false;
    }

    let normal = boundary_normal(ball.position, boundary);
    ball.velocity = reflect(ball.velocity, normal);
    ball.position -= normal * penetration;
    true
}

/// Advance a single ball by one frame. Returns true if this frame starts a
/// new collision episode (contact after a contact-free frame).
pub fn step_ball(ball: &mut Ball, boundary: &Boundary, paused: bool) -> bool {
    if !paused {
        ball.position += ball.velocity;
    }

    let new_episode = if resolve_boundary_contact(ball, boundary) {
        let first_contact = !ball.hit_wall;
        ball.hit_wall = true;
        first_contact
    } else {
        ball.hit_wall = false;
        false
    };

    // Trail keeps recording while paused
    ball.trail.push(ball.position);
    new_episode
}

/// Advance the whole population by one frame.
///
/// Each new collision episode appends one fresh ball drawn at `speed`.
/// Balls appended here are first stepped on the next frame.
pub fn step_balls(
    balls: &mut Vec<Ball>,
    boundary: &Boundary,
    speed: f32,
    paused: bool,
    rng: &mut impl Rng,
) -> StepReport {
    let mut report = StepReport::default();
    let stepped = balls.len();

    for index in 0..stepped {
        if step_ball(&mut balls[index], boundary, paused) {
            report.hits += 1;
            report.wall_hits.push(WallHit {
                ball: index,
                position: balls[index].position,
            });
            balls.push(spawn_ball(boundary, speed, rng));
        }
    }

    report
}
