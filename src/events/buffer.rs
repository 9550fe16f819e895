//! In-memory event buffer for headless runs.

use uuid::Uuid;

use super::types::{BounceConfig, BounceEvent};

/// Simple in-memory event buffer (no file I/O).
#[derive(Default)]
pub struct EventBuffer {
    events: Vec<(u32, BounceEvent)>,
    session_id: String,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session with a fresh UUID
    pub fn start_session(&mut self, timestamp: &str) {
        self.clear();
        self.session_id = Uuid::new_v4().to_string();
        self.log(
            0,
            BounceEvent::SessionStart {
                session_id: self.session_id.clone(),
                timestamp: timestamp.to_string(),
            },
        );
    }

    pub fn log_config(&mut self, config: BounceConfig) {
        self.log(0, BounceEvent::Config(config));
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.session_id.clear();
    }

    pub fn log(&mut self, time_ms: u32, event: BounceEvent) {
        self.events.push((time_ms, event));
    }

    pub fn events(&self) -> &[(u32, BounceEvent)] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_start_is_first_event() {
        let mut buffer = EventBuffer::new();
        buffer.start_session("20260101_000000");
        buffer.log(16, BounceEvent::Pause { paused: true });

        let events = buffer.events();
        assert_eq!(events.len(), 2);
        match &events[0] {
            (0, BounceEvent::SessionStart { session_id, timestamp }) => {
                assert_eq!(session_id.len(), 36);
                assert_eq!(timestamp, "20260101_000000");
            }
            other => panic!("expected SessionStart, got {:?}", other),
        }
        assert_eq!(events[1], (16, BounceEvent::Pause { paused: true }));
    }

    #[test]
    fn test_new_session_clears_previous_events() {
        let mut buffer = EventBuffer::new();
        buffer.start_session("a");
        buffer.log(5, BounceEvent::Reset);
        buffer.start_session("b");
        assert_eq!(buffer.events().len(), 1);
    }
}
