//! Ball module - data types, factory, and physics stepper

mod components;
mod physics;
mod spawning;

pub use components::*;
pub use physics::*;
pub use spawning::*;
