//! Event type definitions for the logging system

use serde::{Deserialize, Serialize};

/// Simulation settings snapshot, logged once after session start
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BounceConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub ball_radius: f32,
    pub trail_length: usize,
    pub initial_speed: f32,
    pub min_speed: f32,
    pub speed_step: f32,
}

/// All events that can be logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BounceEvent {
    // === Session Events ===
    /// Session started (generated once per launch)
    SessionStart {
        session_id: String, // UUID v4
        timestamp: String,
    },
    /// Configuration snapshot (logged after session start)
    Config(BounceConfig),

    // === Simulation Events ===
    /// A ball started a new collision episode
    WallHit {
        frame: u64,
        ball: usize,
        pos: (f32, f32),
        hits: u32,
    },

    // === Control Events ===
    SpeedChange { speed: f32 },
    Pause { paused: bool },
    Reset,
    Resize {
        width: f32,
        height: f32,
        radius: f32,
    },
}

impl BounceEvent {
    /// Get the event type code for compact serialization
    pub fn type_code(&self) -> &'static str {
        match self {
            BounceEvent::SessionStart { .. } => "SE",
            BounceEvent::Config(_) => "CF",
            BounceEvent::WallHit { .. } => "WH",
            BounceEvent::SpeedChange { .. } => "SP",
            BounceEvent::Pause { .. } => "PA",
            BounceEvent::Reset => "RS",
            BounceEvent::Resize { .. } => "RZ",
        }
    }
}
