//! Startup settings for the windowed app
//!
//! Loaded once from config/init_settings.json (never written back) and then
//! overridden by command-line flags.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::{
    DEFAULT_BALL_SPEED, DEFAULT_CAPTION, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
    MIN_BALL_SPEED,
};

/// Path to the settings file
pub const SETTINGS_FILE: &str = "config/init_settings.json";

/// Startup preferences
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitSettings {
    pub window_width: f32,
    pub window_height: f32,
    /// Starting speed bound (clamped to the speed floor)
    pub initial_speed: f32,
    /// Fixed text drawn bottom-left
    pub caption: String,
    /// Write an .evlog file for the session
    pub event_logging: bool,
    pub show_fps: bool,
}

impl Default for InitSettings {
    fn default() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            initial_speed: DEFAULT_BALL_SPEED,
            caption: DEFAULT_CAPTION.to_string(),
            event_logging: true,
            show_fps: true,
        }
    }
}

impl InitSettings {
    /// Load settings from the default file, or defaults if it doesn't exist
    pub fn load() -> Self {
        Self::load_from(SETTINGS_FILE)
    }

    /// Load settings from `path`. Missing or malformed files give defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No {} found, using defaults", path.display());
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<InitSettings>(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {}", path.display());
                    settings.sanitized()
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Apply command-line overrides (`--speed N`, `--no-log`, `--no-fps`)
    pub fn apply_args(mut self, args: &[String]) -> Self {
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--speed" => {
                    i += 1;
                    match args.get(i).and_then(|s| s.parse::<f32>().ok()) {
                        Some(speed) => self.initial_speed = speed,
                        None => warn!("--speed needs a number"),
                    }
                }
                "--no-log" => self.event_logging = false,
                "--no-fps" => self.show_fps = false,
                _ => {}
            }
            i += 1;
        }
        self.sanitized()
    }

    /// Clamp values the app can't run with
    fn sanitized(mut self) -> Self {
        if !(self.initial_speed >= MIN_BALL_SPEED) {
            warn!(
                "Initial speed {} below floor, using {}",
                self.initial_speed, MIN_BALL_SPEED
            );
            self.initial_speed = MIN_BALL_SPEED;
        }
        if !(self.window_width > 0.0) {
            self.window_width = DEFAULT_WINDOW_WIDTH;
        }
        if !(self.window_height > 0.0) {
            self.window_height = DEFAULT_WINDOW_HEIGHT;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = InitSettings::load_from("config/does_not_exist.json");
        assert_eq!(settings, InitSettings::default());
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let parsed: InitSettings =
            serde_json::from_str(r#"{"caption": "hello", "initial_speed": 8.0}"#).unwrap();
        assert_eq!(parsed.caption, "hello");
        assert_eq!(parsed.initial_speed, 8.0);
        assert_eq!(parsed.window_width, DEFAULT_WINDOW_WIDTH);
        assert!(parsed.event_logging);
    }

    #[test]
    fn test_cli_overrides() {
        let settings = InitSettings::default().apply_args(&args(&[
            "ringbounce",
            "--speed",
            "9",
            "--no-log",
        ]));
        assert_eq!(settings.initial_speed, 9.0);
        assert!(!settings.event_logging);
        assert!(settings.show_fps);
    }

    #[test]
    fn test_speed_below_floor_is_clamped() {
        let settings = InitSettings::default().apply_args(&args(&["--speed", "0.2"]));
        assert_eq!(settings.initial_speed, MIN_BALL_SPEED);
    }
}
