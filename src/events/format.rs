//! Compact text format for event serialization
//!
//! Format: `T:NNNNN|CODE|data...`
//! - T:NNNNN = timestamp in milliseconds (5 digits, wraps at 99999)
//! - CODE = 2-char event type code
//! - data = pipe-separated values specific to event type
//!
//! Examples:
//! ```text
//! T:00000|SE|3f2a...|20260101_120000
//! T:00420|WH|25|0|97.0,400.0|1
//! T:01300|SP|6.0
//! T:02000|PA|1
//! T:02500|RS|
//! T:03100|RZ|1024.0|768.0|384.0
//! ```

use super::types::{BounceConfig, BounceEvent};

/// Format a position tuple
fn fmt_pos(pos: (f32, f32)) -> String {
    format!("{:.1},{:.1}", pos.0, pos.1)
}

/// Serialize a BounceEvent to compact text format
pub fn serialize_event(time_ms: u32, event: &BounceEvent) -> String {
    let ts = format!("T:{:05}", time_ms % 100000);
    let code = event.type_code();

    let data = match event {
        BounceEvent::SessionStart {
            session_id,
            timestamp,
        } => {
            format!("{}|{}", session_id, timestamp)
        }
        BounceEvent::Config(config) => {
            // Config as compact JSON
            serde_json::to_string(config).unwrap_or_else(|_| "{}".to_string())
        }
        BounceEvent::WallHit {
            frame,
            ball,
            pos,
            hits,
        } => {
            format!("{}|{}|{}|{}", frame, ball, fmt_pos(*pos), hits)
        }
        BounceEvent::SpeedChange { speed } => format!("{:.1}", speed),
        BounceEvent::Pause { paused } => (if *paused { "1" } else { "0" }).to_string(),
        BounceEvent::Reset => String::new(),
        BounceEvent::Resize {
            width,
            height,
            radius,
        } => {
            format!("{:.1}|{:.1}|{:.1}", width, height, radius)
        }
    };

    format!("{}|{}|{}", ts, code, data)
}

/// Parse a line back into timestamp and event
pub fn parse_event(line: &str) -> Option<(u32, BounceEvent)> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 3 {
        return None;
    }

    let ts_str = parts[0].strip_prefix("T:")?;
    let time_ms: u32 = ts_str.parse().ok()?;

    let code = parts[1];
    let data = &parts[2..];

    let event = match code {
        "SE" if data.len() >= 2 => BounceEvent::SessionStart {
            session_id: data[0].to_string(),
            timestamp: data[1].to_string(),
        },
        "CF" if !data.is_empty() => {
            // Rejoin with | in case the JSON contains one
            let json_str = data.join("|");
            let config: BounceConfig = serde_json::from_str(&json_str).ok()?;
            BounceEvent::Config(config)
        }
        "WH" if data.len() >= 4 => BounceEvent::WallHit {
            frame: data[0].parse().ok()?,
            ball: data[1].parse().ok()?,
            pos: parse_pos(data[2])?,
            hits: data[3].parse().ok()?,
        },
        "SP" if !data.is_empty() => BounceEvent::SpeedChange {
            speed: data[0].parse().ok()?,
        },
        "PA" if !data.is_empty() => BounceEvent::Pause {
            paused: match data[0] {
                "1" => true,
                "0" => false,
                _ => return None,
            },
        },
        "RS" => BounceEvent::Reset,
        "RZ" if data.len() >= 3 => BounceEvent::Resize {
            width: data[0].parse().ok()?,
            height: data[1].parse().ok()?,
            radius: data[2].parse().ok()?,
        },
        _ => return None,
    };

    Some((time_ms, event))
}

fn parse_pos(s: &str) -> Option<(f32, f32)> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return None;
    }
    Some((parts[0].parse().ok()?, parts[1].parse().ok()?))
}
