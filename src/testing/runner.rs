//! Scenario execution engine

use bevy::prelude::*;

use crate::arena::Boundary;
use crate::ball::Ball;
use crate::constants::DEFAULT_BALL_SPEED;
use crate::events::EventBus;
use crate::session::{BounceSession, ControlAction};
use crate::simulation::HeadlessAppBuilder;

use super::assertions::{AssertionError, CapturedEvent, WorldState, check_sequence, check_state};
use super::parser::{ScenarioDefinition, ScenarioSetup};

/// Result of running a scenario
#[derive(Debug)]
pub enum TestResult {
    Pass { frames: u64 },
    Fail { error: AssertionError },
    Error { message: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }
}

/// Build the starting session described by `setup`
fn build_session(setup: &ScenarioSetup) -> Result<BounceSession, String> {
    let boundary = Boundary::from_viewport(setup.viewport_width, setup.viewport_height)
        .ok_or_else(|| {
            format!(
                "Invalid viewport {}x{}",
                setup.viewport_width, setup.viewport_height
            )
        })?;
    let speed = setup.speed.unwrap_or(DEFAULT_BALL_SPEED);
    let seed = setup.seed.unwrap_or(0);

    let mut session = if setup.balls.is_empty() {
        BounceSession::with_seed(boundary, speed, seed)
    } else {
        let mut session = BounceSession::empty(boundary, speed, seed);
        session.balls = setup
            .balls
            .iter()
            .map(|b| Ball::new(Vec2::new(b.x, b.y), Vec2::new(b.vx, b.vy)))
            .collect();
        session
    };
    session.paused = setup.paused;
    Ok(session)
}

/// Run a single scenario and return the result
pub fn run_scenario(scenario: &ScenarioDefinition) -> TestResult {
    let session = match build_session(&scenario.setup) {
        Ok(session) => session,
        Err(message) => return TestResult::Error { message },
    };

    let mut actions: Vec<(u64, ControlAction)> = Vec::with_capacity(scenario.actions.len());
    for action in &scenario.actions {
        match action.to_control() {
            Ok(control) => actions.push((action.frame, control)),
            Err(message) => return TestResult::Error { message },
        }
    }

    let max_frame = scenario.frame_count();
    let mut app = HeadlessAppBuilder::new()
        .with_session(session)
        .with_minimal_threads()
        .build();

    let mut captured: Vec<CapturedEvent> = Vec::new();
    let mut frame = 0;

    if let Err(error) = check_states_at(&app, scenario, frame, &captured) {
        return TestResult::Fail { error };
    }

    while frame < max_frame {
        for (_, control) in actions.iter().filter(|(at, _)| *at == frame) {
            app.world_mut().write_message(*control);
        }

        app.update();
        frame = app.world().resource::<BounceSession>().frame;

        let drained = app.world_mut().resource_mut::<EventBus>().drain();
        captured.extend(
            drained
                .iter()
                .map(|e| CapturedEvent::from_bounce_event(frame, &e.event)),
        );

        if let Err(error) = check_states_at(&app, scenario, frame, &captured) {
            return TestResult::Fail { error };
        }
    }

    if let Err(error) = check_sequence(&scenario.expect.sequence, &captured) {
        return TestResult::Fail { error };
    }

    TestResult::Pass { frames: frame }
}

/// Run every state assertion registered for `frame`
fn check_states_at(
    app: &App,
    scenario: &ScenarioDefinition,
    frame: u64,
    captured: &[CapturedEvent],
) -> Result<(), AssertionError> {
    let session = app.world().resource::<BounceSession>();
    let state = WorldState::new(session, captured);
    for assertion in scenario.expect.state.iter().filter(|a| a.after_frame == frame) {
        check_state(assertion, &state)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SCENARIOS_DIR;
    use crate::testing::parser::parse_scenario_file;
    use std::fs;
    use std::path::Path;

    fn scenario(toml: &str) -> ScenarioDefinition {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_failing_check_reports_fail() {
        let def = scenario(
            r#"
name = "Wrong"
[setup]
viewport_width = 200.0
viewport_height = 200.0
[[setup.balls]]
x = 100.0
y = 100.0
vx = 1.0

[[expect.state]]
after_frame = 2
checks = ["ball0.x == 150"]
"#,
        );
        assert!(matches!(run_scenario(&def), TestResult::Fail { .. }));
    }

    #[test]
    fn test_bad_setup_reports_error() {
        let def = scenario("name = \"Bad\"\n[setup]\nviewport_width = 0.0\n");
        assert!(matches!(run_scenario(&def), TestResult::Error { .. }));
    }

    #[test]
    fn test_bundled_scenarios_pass() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(SCENARIOS_DIR);
        let mut paths: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|e| e == "toml"))
            .collect();
        paths.sort();
        assert!(!paths.is_empty());

        for path in paths {
            let def = parse_scenario_file(&path).unwrap();
            let result = run_scenario(&def);
            assert!(result.is_pass(), "{}: {:?}", path.display(), result);
        }
    }
}
