//! Simulation context - owns the population, boundary, counters and controls
//!
//! Everything the frame loop and control handlers share lives here, so the
//! stepper never touches ambient state.

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::arena::Boundary;
use crate::ball::{Ball, StepReport, random_velocity, spawn_ball, step_balls};
use crate::constants::{BALL_RADIUS, MIN_BALL_SPEED, SPEED_STEP, TRAIL_LENGTH};
use crate::events::{BounceConfig, BounceEvent, EventBus};

/// Discrete controls applied between frames
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    TogglePause,
    Reset,
    SpeedUp,
    SpeedDown,
    Resize { width: f32, height: f32 },
}

impl ControlAction {
    /// Label shown on the matching on-screen button
    pub fn label(&self) -> &'static str {
        match self {
            ControlAction::TogglePause => "Pause",
            ControlAction::Reset => "Reset",
            ControlAction::SpeedUp => "Faster",
            ControlAction::SpeedDown => "Slower",
            ControlAction::Resize { .. } => "Resize",
        }
    }
}

/// What a control actually changed (None-like results are dropped)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlOutcome {
    Paused(bool),
    Reset,
    SpeedChanged(f32),
    Resized(Boundary),
    Ignored,
}

/// The running simulation
#[derive(Resource, Debug, Clone)]
pub struct BounceSession {
    pub balls: Vec<Ball>,
    pub boundary: Boundary,
    pub hit_count: u32,
    pub speed: f32,
    pub paused: bool,
    pub frame: u64,
    rng: StdRng,
}

impl BounceSession {
    /// New session with one ball and an entropy-seeded RNG
    pub fn new(boundary: Boundary, speed: f32) -> Self {
        Self::with_rng(boundary, speed, StdRng::from_entropy())
    }

    /// Reproducible session (headless runs and tests)
    pub fn with_seed(boundary: Boundary, speed: f32, seed: u64) -> Self {
        Self::with_rng(boundary, speed, StdRng::seed_from_u64(seed))
    }

    fn with_rng(boundary: Boundary, speed: f32, mut rng: StdRng) -> Self {
        let first = spawn_ball(&boundary, speed, &mut rng);
        Self {
            balls: vec![first],
            boundary,
            hit_count: 0,
            speed,
            paused: false,
            frame: 0,
            rng,
        }
    }

    /// Empty session for scripted setups; balls are added by the caller
    pub fn empty(boundary: Boundary, speed: f32, seed: u64) -> Self {
        Self {
            balls: Vec::new(),
            boundary,
            hit_count: 0,
            speed,
            paused: false,
            frame: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Advance one frame
    pub fn step(&mut self) -> StepReport {
        let report = step_balls(
            &mut self.balls,
            &self.boundary,
            self.speed,
            self.paused,
            &mut self.rng,
        );
        self.hit_count = self.hit_count.saturating_add(report.hits);
        self.frame += 1;
        report
    }

    pub fn population(&self) -> usize {
        self.balls.len()
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Back to a single fresh ball with the hit counter zeroed.
    /// Speed and pause state are kept.
    pub fn reset(&mut self) {
        let fresh = spawn_ball(&self.boundary, self.speed, &mut self.rng);
        self.balls.clear();
        self.balls.push(fresh);
        self.hit_count = 0;
    }

    /// Raise the speed bound (no ceiling) and re-roll every velocity
    pub fn increase_speed(&mut self) {
        self.speed += SPEED_STEP;
        self.randomize_velocities();
    }

    /// Lower the speed bound unless already at the floor.
    /// Returns false (and changes nothing) at the floor.
    pub fn decrease_speed(&mut self) -> bool {
        if self.speed <= MIN_BALL_SPEED {
            return false;
        }
        self.speed = (self.speed - SPEED_STEP).max(MIN_BALL_SPEED);
        self.randomize_velocities();
        true
    }

    fn randomize_velocities(&mut self) {
        for ball in &mut self.balls {
            ball.velocity = random_velocity(self.speed, &mut self.rng);
        }
    }

    /// Recompute the boundary for a new viewport. Balls are left where they
    /// are; the next step pulls any outsiders back onto the wall.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        match Boundary::from_viewport(width, height) {
            Some(boundary) => {
                self.boundary = boundary;
                true
            }
            None => false,
        }
    }

    /// Settings snapshot for the event log
    pub fn config_snapshot(&self) -> BounceConfig {
        let viewport = self.boundary.viewport();
        BounceConfig {
            viewport_width: viewport.x,
            viewport_height: viewport.y,
            ball_radius: BALL_RADIUS,
            trail_length: TRAIL_LENGTH,
            initial_speed: self.speed,
            min_speed: MIN_BALL_SPEED,
            speed_step: SPEED_STEP,
        }
    }

    /// Apply one control action
    pub fn apply(&mut self, action: ControlAction) -> ControlOutcome {
        match action {
            ControlAction::TogglePause => ControlOutcome::Paused(self.toggle_pause()),
            ControlAction::Reset => {
                self.reset();
                ControlOutcome::Reset
            }
            ControlAction::SpeedUp => {
                self.increase_speed();
                ControlOutcome::SpeedChanged(self.speed)
            }
            ControlAction::SpeedDown => {
                if self.decrease_speed() {
                    ControlOutcome::SpeedChanged(self.speed)
                } else {
                    ControlOutcome::Ignored
                }
            }
            ControlAction::Resize { width, height } => {
                if self.resize(width, height) {
                    ControlOutcome::Resized(self.boundary)
                } else {
                    ControlOutcome::Ignored
                }
            }
        }
    }
}

/// Queue one WallHit event per counted hit in `report`.
/// `hits_before` is the counter value before the step.
pub fn emit_wall_hits(bus: &mut EventBus, report: &StepReport, frame: u64, hits_before: u32) {
    for (i, hit) in report.wall_hits.iter().enumerate() {
        bus.emit(BounceEvent::WallHit {
            frame,
            ball: hit.ball,
            pos: (hit.position.x, hit.position.y),
            hits: hits_before + i as u32 + 1,
        });
    }
}

/// Per-frame step; every counted wall hit goes to the event bus
pub fn advance_session(mut session: ResMut<BounceSession>, mut bus: ResMut<EventBus>) {
    let hits_before = session.hit_count;
    let report = session.step();
    emit_wall_hits(&mut bus, &report, session.frame, hits_before);
}
