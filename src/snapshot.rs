//! Snapshot system - captures session state as JSON plus a PNG rendering
//!
//! Used by the headless simulator (`--snapshot`) and by the F4 key in the
//! windowed app.

use bevy::prelude::*;
use chrono::Local;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::session::BounceSession;

/// Directory where in-app snapshots are saved
const SNAPSHOT_DIR: &str = "snapshots";

/// Serializable snapshot of the whole session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub timestamp: String,
    pub frame: u64,
    pub hit_count: u32,
    pub speed: f32,
    pub paused: bool,
    pub boundary_center: (f32, f32),
    pub boundary_radius: f32,
    pub balls: Vec<BallSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub position: (f32, f32),
    pub velocity: (f32, f32),
    pub hit_wall: bool,
    /// Oldest first
    pub trail: Vec<(f32, f32)>,
}

impl SessionSnapshot {
    pub fn capture(session: &BounceSession) -> Self {
        Self {
            timestamp: Local::now().format("%Y%m%d_%H%M%S_%3f").to_string(),
            frame: session.frame,
            hit_count: session.hit_count,
            speed: session.speed,
            paused: session.paused,
            boundary_center: (session.boundary.center.x, session.boundary.center.y),
            boundary_radius: session.boundary.radius,
            balls: session
                .balls
                .iter()
                .map(|ball| BallSnapshot {
                    position: (ball.position.x, ball.position.y),
                    velocity: (ball.velocity.x, ball.velocity.y),
                    hit_wall: ball.hit_wall,
                    trail: ball.trail.iter().map(|p| (p.x, p.y)).collect(),
                })
                .collect(),
        }
    }

    /// Draw the snapshot in canvas space onto a fresh image sized to the
    /// boundary's viewport.
    pub fn render(&self) -> RgbaImage {
        let width = (self.boundary_center.0 * 2.0).round().max(1.0) as u32;
        let height = (self.boundary_center.1 * 2.0).round().max(1.0) as u32;
        let mut img = RgbaImage::from_pixel(width, height, to_rgba(BACKGROUND_COLOR));

        let center = (
            self.boundary_center.0.round() as i32,
            self.boundary_center.1.round() as i32,
        );
        draw_hollow_circle_mut(
            &mut img,
            center,
            self.boundary_radius.round() as i32,
            to_rgba(BOUNDARY_COLOR),
        );

        let trail_color = to_rgba(TRAIL_COLOR);
        for ball in &self.balls {
            for pair in ball.trail.windows(2) {
                draw_line_segment_mut(&mut img, pair[0], pair[1], trail_color);
            }
        }

        let ball_color = to_rgba(BALL_COLOR);
        for ball in &self.balls {
            draw_filled_circle_mut(
                &mut img,
                (
                    ball.position.0.round() as i32,
                    ball.position.1.round() as i32,
                ),
                BALL_RADIUS.round() as i32,
                ball_color,
            );
        }

        img
    }

    /// Write `<base>.json` and `<base>.png`, creating parent directories
    pub fn save(&self, base: &Path) -> Result<(PathBuf, PathBuf), String> {
        if let Some(parent) = base.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }

        let json_path = base.with_extension("json");
        let png_path = base.with_extension("png");

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize snapshot: {}", e))?;
        fs::write(&json_path, json)
            .map_err(|e| format!("Failed to write {}: {}", json_path.display(), e))?;

        self.render()
            .save(&png_path)
            .map_err(|e| format!("Failed to write {}: {}", png_path.display(), e))?;

        Ok((json_path, png_path))
    }
}

fn to_rgba(color: Color) -> Rgba<u8> {
    let c = color.to_srgba();
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([
        channel(c.red),
        channel(c.green),
        channel(c.blue),
        channel(c.alpha),
    ])
}

/// Manual snapshot trigger (F4 key)
pub fn manual_snapshot(keyboard: Res<ButtonInput<KeyCode>>, session: Res<BounceSession>) {
    if !keyboard.just_pressed(KeyCode::F4) {
        return;
    }

    let snapshot = SessionSnapshot::capture(&session);
    let base = Path::new(SNAPSHOT_DIR).join(format!("snapshot_{}", snapshot.timestamp));
    match snapshot.save(&base) {
        Ok((json, png)) => info!("Snapshot saved: {} + {}", json.display(), png.display()),
        Err(e) => error!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Boundary;

    fn session() -> BounceSession {
        let boundary = Boundary::from_viewport(160.0, 120.0).unwrap();
        let mut session = BounceSession::with_seed(boundary, 4.0, 21);
        for _ in 0..30 {
            session.step();
        }
        session
    }

    #[test]
    fn test_capture_mirrors_session() {
        let session = session();
        let snapshot = SessionSnapshot::capture(&session);
        assert_eq!(snapshot.frame, 30);
        assert_eq!(snapshot.balls.len(), session.population());
        assert_eq!(snapshot.balls[0].trail.len(), 30);
        assert_eq!(snapshot.boundary_radius, 60.0);
    }

    #[test]
    fn test_render_size_and_ring() {
        let snapshot = SessionSnapshot::capture(&session());
        let img = snapshot.render();
        assert_eq!(img.dimensions(), (160, 120));
        // Top of the ring is drawn in the boundary color
        assert_eq!(*img.get_pixel(80, 0), to_rgba(BOUNDARY_COLOR));
        // Corner stays background
        assert_eq!(*img.get_pixel(0, 0), to_rgba(BACKGROUND_COLOR));
    }

    #[test]
    fn test_save_writes_both_files() {
        let dir = std::env::temp_dir().join(format!("ringbounce_snap_{}", uuid::Uuid::new_v4()));
        let (json, png) = SessionSnapshot::capture(&session())
            .save(&dir.join("final"))
            .unwrap();
        assert!(json.exists());
        assert!(png.exists());

        let parsed: SessionSnapshot =
            serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(parsed.frame, 30);
        let _ = fs::remove_dir_all(&dir);
    }
}
