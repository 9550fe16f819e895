//! Tunable constants for ringbounce
//!
//! Physics values are fixed here; window and speed defaults can be
//! overridden through `config/init_settings.json`.

use bevy::prelude::*;

// =============================================================================
// COLORS
// =============================================================================

pub const BACKGROUND_COLOR: Color = Color::srgb(0.97, 0.96, 0.93);
pub const BOUNDARY_COLOR: Color = Color::srgb(0.1, 0.1, 0.12);
pub const BALL_COLOR: Color = Color::srgb(0.1, 0.1, 0.12);
pub const TRAIL_COLOR: Color = Color::srgba(0.1, 0.1, 0.12, 0.6);

pub const TEXT_PRIMARY: Color = Color::srgb(0.1, 0.1, 0.12);
pub const TEXT_SECONDARY: Color = Color::srgb(0.4, 0.4, 0.45);

pub const BUTTON_NORMAL: Color = Color::srgb(0.85, 0.84, 0.8);
pub const BUTTON_HOVERED: Color = Color::srgb(0.75, 0.74, 0.7);
pub const BUTTON_PRESSED: Color = Color::srgb(0.6, 0.59, 0.55);

// =============================================================================
// BALL PHYSICS
// =============================================================================

pub const BALL_RADIUS: f32 = 3.0; // Shared by every ball
pub const TRAIL_LENGTH: usize = 50; // Positions kept per ball, oldest evicted first
pub const DEFAULT_BALL_SPEED: f32 = 5.0; // Max |component| of a fresh velocity (px/frame)
pub const MIN_BALL_SPEED: f32 = 1.0; // Decrease control stops here
pub const SPEED_STEP: f32 = 1.0; // Change per increase/decrease press
pub const SPAWN_MAX_ATTEMPTS: u32 = 32; // Rejection-sampling cap before falling back to center

// =============================================================================
// WINDOW / HUD
// =============================================================================

pub const DEFAULT_WINDOW_WIDTH: f32 = 1280.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 800.0;
pub const DEFAULT_CAPTION: &str = "ringbounce";
pub const HUD_FONT_SIZE: f32 = 20.0;
pub const CAPTION_FONT_SIZE: f32 = 20.0;
pub const FPS_WINDOW_SECS: f64 = 1.0; // Rolling window for frame counting

// =============================================================================
// Z ORDER
// =============================================================================

pub const BALL_Z: f32 = 2.0;
