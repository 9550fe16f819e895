//! Scenario testing system for deterministic session tests
//!
//! Runs scripted control sequences against a headless session and checks
//! the resulting state and event stream.

pub mod assertions;
pub mod parser;
pub mod runner;

pub use assertions::{AssertionError, CapturedEvent, WorldState, check_sequence, check_state};
pub use parser::{
    BallDef, ExpectedEvent, FrameAction, ScenarioDefinition, ScenarioExpectations, ScenarioSetup,
    StateAssertion, parse_scenario_file,
};
pub use runner::{TestResult, run_scenario};

/// Default path for test scenarios
pub const SCENARIOS_DIR: &str = "tests/scenarios";
