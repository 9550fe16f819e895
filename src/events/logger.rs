//! Event logger - writes one `.evlog` file per interactive session

use bevy::prelude::*;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use uuid::Uuid;

use super::bus::EventBus;
use super::format::serialize_event;
use super::types::{BounceConfig, BounceEvent};

/// Configuration for event logging
#[derive(Resource, Clone)]
pub struct EventLogConfig {
    /// Directory for log files
    pub log_dir: PathBuf,
    pub enabled: bool,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            enabled: true,
        }
    }
}

/// Active event logger with file handle
#[derive(Resource)]
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    session_id: String,
    path: Option<PathBuf>,
    config: EventLogConfig,
}

impl EventLogger {
    /// Create a new event logger (file is opened by `start_session`)
    pub fn new(config: EventLogConfig) -> Self {
        Self {
            writer: None,
            session_id: String::new(),
            path: None,
            config,
        }
    }

    /// Open `<timestamp>_<session8>.evlog` and log SessionStart
    pub fn start_session(&mut self, timestamp: &str) {
        if !self.config.enabled {
            return;
        }

        self.session_id = Uuid::new_v4().to_string();

        if let Err(e) = std::fs::create_dir_all(&self.config.log_dir) {
            warn!("Failed to create log directory: {}", e);
            return;
        }

        let filename = format!("{}_{}.evlog", timestamp, &self.session_id[..8]);
        let path = self.config.log_dir.join(filename);

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
        {
            Ok(file) => {
                self.writer = Some(BufWriter::new(file));
                info!(
                    "Event logging started: {} (session: {})",
                    path.display(),
                    &self.session_id[..8]
                );
                self.path = Some(path);

                self.log(
                    0,
                    BounceEvent::SessionStart {
                        session_id: self.session_id.clone(),
                        timestamp: timestamp.to_string(),
                    },
                );
            }
            Err(e) => {
                warn!("Failed to open event log: {}", e);
            }
        }
    }

    /// Log the configuration (call after start_session)
    pub fn log_config(&mut self, config: BounceConfig) {
        self.log(0, BounceEvent::Config(config));
    }

    /// Path of the open log file, if any
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Flush and close the current log file
    pub fn end_session(&mut self) {
        if let Some(mut writer) = self.writer.take()
            && let Err(e) = writer.flush()
        {
            warn!("Failed to flush event log: {}", e);
        }
    }

    pub fn log(&mut self, time_ms: u32, event: BounceEvent) {
        let Some(writer) = &mut self.writer else {
            return;
        };

        let line = serialize_event(time_ms, &event);
        if let Err(e) = writeln!(writer, "{}", line) {
            warn!("Failed to write event: {}", e);
        }
    }

    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new(EventLogConfig::default())
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        self.end_session();
    }
}

/// Drain the bus into the log file once per frame
pub fn write_bus_events(mut bus: ResMut<EventBus>, mut logger: ResMut<EventLogger>) {
    for bus_event in bus.drain() {
        logger.log(bus_event.time_ms, bus_event.event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::parse_event;

    fn temp_log_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ringbounce_evlog_{}_{}", tag, Uuid::new_v4()))
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let dir = temp_log_dir("off");
        let mut logger = EventLogger::new(EventLogConfig {
            log_dir: dir.clone(),
            enabled: false,
        });
        logger.start_session("20260101_000000");
        assert!(!logger.is_active());
        assert!(!dir.exists());
    }

    #[test]
    fn test_session_file_contents() {
        let dir = temp_log_dir("on");
        let mut logger = EventLogger::new(EventLogConfig {
            log_dir: dir.clone(),
            enabled: true,
        });
        logger.start_session("20260101_000000");
        assert!(logger.is_active());
        logger.log(40, BounceEvent::SpeedChange { speed: 6.0 });
        let path = logger.path().cloned().unwrap();
        logger.end_session();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("20260101_000000_"));
        assert!(name.ends_with(".evlog"));

        let content = std::fs::read_to_string(&path).unwrap();
        let events: Vec<_> = content.lines().filter_map(parse_event).collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].1.type_code(), "SE");
        assert_eq!(events[1], (40, BounceEvent::SpeedChange { speed: 6.0 }));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
