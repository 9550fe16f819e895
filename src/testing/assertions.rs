//! Assertion checking for scenario expectations

use std::collections::HashMap;

use super::parser::{ExpectedEvent, StateAssertion};
use crate::events::BounceEvent;
use crate::session::BounceSession;

/// Error when an assertion fails
#[derive(Debug)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n    Expected: {}\n    Actual: {}", self.message, self.expected, self.actual)
    }
}

/// Captured event with timing info
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    /// Session frame after the update that emitted it
    pub frame: u64,
    pub code: String,
    pub ball: Option<usize>,
}

impl CapturedEvent {
    pub fn from_bounce_event(frame: u64, event: &BounceEvent) -> Self {
        let ball = match event {
            BounceEvent::WallHit { ball, .. } => Some(*ball),
            _ => None,
        };
        Self {
            frame,
            code: event.type_code().to_string(),
            ball,
        }
    }
}

/// Check if captured events contain the expected sequence, in order
pub fn check_sequence(expected: &[ExpectedEvent], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    let mut captured_idx = 0;

    for (i, exp) in expected.iter().enumerate() {
        let found = captured[captured_idx..].iter().enumerate().find(|(_, cap)| {
            cap.code == exp.event && (exp.ball.is_none() || cap.ball == exp.ball)
        });

        let Some((offset, cap)) = found else {
            let ball_str = exp.ball.map(|b| format!(" (ball: {})", b)).unwrap_or_default();
            return Err(AssertionError {
                message: format!("Event #{} '{}'{} not found", i + 1, exp.event, ball_str),
                expected: format!("'{}' event in sequence", exp.event),
                actual: format!(
                    "events after position {}: {:?}",
                    captured_idx,
                    captured[captured_idx..].iter().map(|e| &e.code).collect::<Vec<_>>()
                ),
            });
        };

        if let Some(min) = exp.frame_min
            && cap.frame < min
        {
            return Err(AssertionError {
                message: format!("Event #{} '{}' occurred too early", i + 1, exp.event),
                expected: format!("frame >= {}", min),
                actual: format!("frame {}", cap.frame),
            });
        }
        if let Some(max) = exp.frame_max
            && cap.frame > max
        {
            return Err(AssertionError {
                message: format!("Event #{} '{}' occurred too late", i + 1, exp.event),
                expected: format!("frame <= {}", max),
                actual: format!("frame {}", cap.frame),
            });
        }
        captured_idx += offset + 1;
    }

    Ok(())
}

/// Observable session state for assertions
pub struct WorldState<'a> {
    pub session: &'a BounceSession,
    /// Events captured so far, counted by type code
    pub event_counts: HashMap<String, usize>,
}

impl<'a> WorldState<'a> {
    pub fn new(session: &'a BounceSession, captured: &[CapturedEvent]) -> Self {
        let mut event_counts = HashMap::new();
        for event in captured {
            *event_counts.entry(event.code.clone()).or_insert(0) += 1;
        }
        Self {
            session,
            event_counts,
        }
    }

    /// Numeric or boolean value at `path`
    fn lookup(&self, path: &str) -> Result<Value, AssertionError> {
        let session = self.session;
        let parts: Vec<&str> = path.split('.').collect();

        let value = match parts.as_slice() {
            ["hits"] => Value::Number(session.hit_count as f32),
            ["population"] => Value::Number(session.population() as f32),
            ["speed"] => Value::Number(session.speed),
            ["paused"] => Value::Bool(session.paused),
            ["frame"] => Value::Number(session.frame as f32),
            ["radius"] => Value::Number(session.boundary.radius),
            ["center", "x"] => Value::Number(session.boundary.center.x),
            ["center", "y"] => Value::Number(session.boundary.center.y),
            ["max_penetration"] => Value::Number(
                session
                    .balls
                    .iter()
                    .map(|b| session.boundary.penetration(b.position))
                    .fold(f32::NEG_INFINITY, f32::max),
            ),
            ["events", code] => {
                Value::Number(self.event_counts.get(*code).copied().unwrap_or(0) as f32)
            }
            [ball, field] if ball.starts_with("ball") => {
                let index: usize = ball["ball".len()..].parse().map_err(|_| AssertionError {
                    message: format!("Invalid ball reference: {}", path),
                    expected: "ballN.field".to_string(),
                    actual: path.to_string(),
                })?;
                let b = session.balls.get(index).ok_or_else(|| AssertionError {
                    message: format!("Ball {} not found", index),
                    expected: format!("ball {}", index),
                    actual: format!("population {}", session.population()),
                })?;
                match *field {
                    "x" => Value::Number(b.position.x),
                    "y" => Value::Number(b.position.y),
                    "vx" => Value::Number(b.velocity.x),
                    "vy" => Value::Number(b.velocity.y),
                    "speed" => Value::Number(b.speed()),
                    "dist" => Value::Number(b.position.distance(session.boundary.center)),
                    "trail" => Value::Number(b.trail.len() as f32),
                    "hit_wall" => Value::Bool(b.hit_wall),
                    _ => return Err(unknown_path(path)),
                }
            }
            _ => return Err(unknown_path(path)),
        };
        Ok(value)
    }
}

enum Value {
    Number(f32),
    Bool(bool),
}

fn unknown_path(path: &str) -> AssertionError {
    AssertionError {
        message: format!("Unknown state path: {}", path),
        expected: "hits, population, speed, paused, frame, radius, center.x/y, \
                   max_penetration, events.CODE or ballN.field"
            .to_string(),
        actual: path.to_string(),
    }
}

/// Parse a check string into (path, operator, value)
fn parse_check(check: &str) -> Option<(&str, &str, &str)> {
    // Two-character operators first so "==" is not read as "="
    for op in &["==", ">=", "<=", "!=", "=", ">", "<"] {
        if let Some(idx) = check.find(op) {
            let path = check[..idx].trim();
            let value = check[idx + op.len()..].trim();
            return Some((path, op, value));
        }
    }
    None
}

/// Check state assertions against world state
pub fn check_state(assertion: &StateAssertion, state: &WorldState) -> Result<(), AssertionError> {
    for check in &assertion.checks {
        let (path, operator, expected_value) = parse_check(check).ok_or_else(|| AssertionError {
            message: format!("Invalid check syntax: {}", check),
            expected: "format: 'path == value' or 'path > value'".to_string(),
            actual: check.clone(),
        })?;

        match state.lookup(path)? {
            Value::Number(actual) => check_float_comparison(path, actual, operator, expected_value)?,
            Value::Bool(actual) => {
                let expected = expected_value == "true";
                let pass = match operator {
                    "!=" => actual != expected,
                    _ => actual == expected,
                };
                if !pass {
                    return Err(AssertionError {
                        message: format!("Check failed: {}", check),
                        expected: expected_value.to_string(),
                        actual: actual.to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Check float comparison with operator
fn check_float_comparison(path: &str, actual: f32, operator: &str, expected_str: &str) -> Result<(), AssertionError> {
    let value: f32 = expected_str.trim().parse().map_err(|_| AssertionError {
        message: format!("Invalid value for {}", path),
        expected: "number".to_string(),
        actual: expected_str.to_string(),
    })?;

    let pass = match operator {
        ">=" => actual >= value,
        "<=" => actual <= value,
        ">" => actual > value,
        "<" => actual < value,
        "=" | "==" => (actual - value).abs() < 0.1,
        "!=" => (actual - value).abs() >= 0.1,
        _ => true,
    };

    if !pass {
        return Err(AssertionError {
            message: format!("Check failed: {} {} {} (actual: {:.2})", path, operator, expected_str, actual),
            expected: format!("{} {} {}", path, operator, value),
            actual: format!("{:.2}", actual),
        });
    }

    Ok(())
}
