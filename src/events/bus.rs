//! Event Bus - hands simulation and control events to the logger
//!
//! The step system emits WallHit events, the control system emits
//! pause/speed/reset/resize events, and the logger drains them once per frame.

use bevy::prelude::*;

use super::types::BounceEvent;

/// Timestamped event for the event bus
#[derive(Debug, Clone, PartialEq)]
pub struct BusEvent {
    /// Time in milliseconds since app start
    pub time_ms: u32,
    pub event: BounceEvent,
}

/// Per-frame queue of events waiting for the logger
#[derive(Resource, Default)]
pub struct EventBus {
    pending: Vec<BusEvent>,
    elapsed_ms: u32,
    /// Disabled buses drop everything (logging off)
    enabled: bool,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// Update the elapsed time (called each frame)
    pub fn update_time(&mut self, elapsed_secs: f32) {
        self.elapsed_ms = (elapsed_secs * 1000.0) as u32;
    }

    pub fn emit(&mut self, event: BounceEvent) {
        if !self.enabled {
            return;
        }
        self.pending.push(BusEvent {
            time_ms: self.elapsed_ms,
            event,
        });
    }

    /// Get pending events without draining
    pub fn peek(&self) -> &[BusEvent] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<BusEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// System to update the event bus time each frame
pub fn update_event_bus_time(mut bus: ResMut<EventBus>, time: Res<Time>) {
    bus.update_time(time.elapsed_secs());
}
