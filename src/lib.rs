//! ringbounce - bouncing balls in a circular boundary, built with Bevy
//!
//! This crate provides the simulation core, the Bevy systems for the windowed
//! app, and the headless tooling (batch simulation, scenario tests).

// Simulation core
pub mod arena;
pub mod ball;
pub mod constants;
pub mod session;

// App modules
pub mod events;
pub mod input;
pub mod render;
pub mod settings;
pub mod ui;

// Headless tooling
pub mod simulation;
pub mod snapshot;
pub mod testing;

// Re-export commonly used types for convenience
pub use arena::Boundary;
pub use ball::{Ball, BallVisual, StepReport, Trail, WallHit, spawn_ball, step_balls};
pub use constants::*;
pub use events::{
    BounceConfig, BounceEvent, BusEvent, EventBuffer, EventBus, EventLogConfig, EventLogger,
};
pub use session::{BounceSession, ControlAction, ControlOutcome};
pub use settings::InitSettings;
pub use snapshot::{BallSnapshot, SessionSnapshot};
pub use ui::{FpsCounter, HitCountText};
