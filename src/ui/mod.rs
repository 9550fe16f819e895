//! UI module - HUD texts, fps counter and control buttons

mod buttons;
mod fps;
mod hud;

pub use buttons::*;
pub use fps::*;
pub use hud::*;
