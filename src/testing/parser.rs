//! TOML scenario file parsing

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::session::ControlAction;

/// Complete scenario definition from a TOML file
#[derive(Debug, Deserialize)]
pub struct ScenarioDefinition {
    pub name: String,
    pub description: Option<String>,
    pub setup: ScenarioSetup,
    /// Frames to run; defaults to the last frame anything refers to
    pub frames: Option<u64>,
    #[serde(default)]
    pub actions: Vec<FrameAction>,
    #[serde(default)]
    pub expect: ScenarioExpectations,
}

/// Starting state of the session
#[derive(Debug, Deserialize)]
pub struct ScenarioSetup {
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
    pub seed: Option<u64>,
    pub speed: Option<f32>,
    #[serde(default)]
    pub paused: bool,
    /// Scripted balls in canvas space. Empty means one random ball.
    #[serde(default)]
    pub balls: Vec<BallDef>,
}

fn default_viewport_width() -> f32 {
    800.0
}

fn default_viewport_height() -> f32 {
    600.0
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BallDef {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub vx: f32,
    #[serde(default)]
    pub vy: f32,
}

/// Control applied before the step that follows `frame`
#[derive(Debug, Clone, Deserialize)]
pub struct FrameAction {
    pub frame: u64,
    /// pause, reset, speed_up, speed_down or resize
    pub action: String,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl FrameAction {
    pub fn to_control(&self) -> Result<ControlAction, String> {
        match self.action.as_str() {
            "pause" => Ok(ControlAction::TogglePause),
            "reset" => Ok(ControlAction::Reset),
            "speed_up" => Ok(ControlAction::SpeedUp),
            "speed_down" => Ok(ControlAction::SpeedDown),
            "resize" => match (self.width, self.height) {
                (Some(width), Some(height)) => Ok(ControlAction::Resize { width, height }),
                _ => Err(format!(
                    "Action 'resize' at frame {} needs width and height",
                    self.frame
                )),
            },
            other => Err(format!("Unknown action '{}' at frame {}", other, self.frame)),
        }
    }
}

/// Expected scenario outcomes
#[derive(Debug, Default, Deserialize)]
pub struct ScenarioExpectations {
    #[serde(default)]
    pub sequence: Vec<ExpectedEvent>,
    /// Multiple state assertions at different frames (uses [[expect.state]] TOML syntax)
    #[serde(default)]
    pub state: Vec<StateAssertion>,
}

/// Expected event in sequence, by type code (WH, SP, PA, RS, RZ)
#[derive(Debug, Deserialize)]
pub struct ExpectedEvent {
    pub event: String,
    /// Ball index, WallHit only
    pub ball: Option<usize>,
    pub frame_min: Option<u64>,
    pub frame_max: Option<u64>,
}

/// State assertion after a given frame
#[derive(Debug, Clone, Deserialize)]
pub struct StateAssertion {
    pub after_frame: u64,
    #[serde(default)]
    pub checks: Vec<String>,
}

impl ScenarioDefinition {
    /// Last frame the scenario needs to reach
    pub fn frame_count(&self) -> u64 {
        if let Some(frames) = self.frames {
            return frames;
        }
        let last_check = self.expect.state.iter().map(|s| s.after_frame).max();
        let last_action = self.actions.iter().map(|a| a.frame + 1).max();
        let last_event = self.expect.sequence.iter().filter_map(|e| e.frame_max).max();
        [last_check, last_action, last_event]
            .into_iter()
            .flatten()
            .max()
            .unwrap_or(60)
    }
}

/// Parse a scenario file from path
pub fn parse_scenario_file(path: &Path) -> Result<ScenarioDefinition, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let toml = r#"
name = "Test"
[setup]
viewport_width = 200.0
viewport_height = 200.0
paused = true
[[setup.balls]]
x = 198.0
y = 100.0
vx = 5.0

[[actions]]
frame = 2
action = "resize"
width = 100.0
height = 80.0

[[expect.state]]
after_frame = 4
checks = ["hits == 1"]
"#;
        let def: ScenarioDefinition = toml::from_str(toml).unwrap();
        assert_eq!(def.name, "Test");
        assert!(def.setup.paused);
        assert_eq!(def.setup.balls[0].vy, 0.0);
        assert_eq!(
            def.actions[0].to_control().unwrap(),
            ControlAction::Resize {
                width: 100.0,
                height: 80.0
            }
        );
        assert_eq!(def.frame_count(), 4);
    }

    #[test]
    fn test_defaults_and_bad_actions() {
        let def: ScenarioDefinition = toml::from_str("name = \"Empty\"\n[setup]\n").unwrap();
        assert_eq!(def.setup.viewport_width, 800.0);
        assert!(def.setup.balls.is_empty());
        assert_eq!(def.frame_count(), 60);

        let bad = FrameAction {
            frame: 0,
            action: "resize".to_string(),
            width: Some(10.0),
            height: None,
        };
        assert!(bad.to_control().is_err());
        let unknown = FrameAction {
            action: "jump".to_string(),
            ..bad
        };
        assert!(unknown.to_control().is_err());
    }
}
