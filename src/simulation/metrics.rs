//! Metrics collection for headless runs

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ball::StepReport;
use crate::events::BounceEvent;
use crate::session::BounceSession;

/// Per-run counters updated after every step
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct RunMetrics {
    pub frames: u64,
    pub hits: u32,
    pub first_hit_frame: Option<u64>,
    pub max_trail_len: usize,
    /// Worst penetration seen after correction (should stay <= ~0)
    pub max_penetration: f32,
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self {
            frames: 0,
            hits: 0,
            first_hit_frame: None,
            max_trail_len: 0,
            max_penetration: f32::NEG_INFINITY,
        }
    }
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one step's outcome into the counters
    pub fn observe(&mut self, session: &BounceSession, report: &StepReport) {
        self.frames = session.frame;
        self.hits = session.hit_count;
        if report.hits > 0 && self.first_hit_frame.is_none() {
            self.first_hit_frame = Some(session.frame);
        }
        for ball in &session.balls {
            self.max_trail_len = self.max_trail_len.max(ball.trail.len());
            // Balls spawned this frame haven't been stepped yet
            if !ball.trail.is_empty() {
                self.max_penetration = self
                    .max_penetration
                    .max(session.boundary.penetration(ball.position));
            }
        }
    }
}

/// Result of a single run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub seed: u64,
    pub speed: f32,
    pub viewport: (f32, f32),
    pub frames_run: u64,
    pub hits: u32,
    pub final_population: usize,
    pub first_hit_frame: Option<u64>,
    pub max_trail_len: usize,
    pub max_penetration: f32,
    /// "frames" or "population_cap"
    pub end_reason: String,
    /// Logged events for this run (used for DB persistence)
    #[serde(skip)]
    pub events: Vec<(u32, BounceEvent)>,
}

/// Aggregate over all runs of one speed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedSummary {
    pub speed: f32,
    pub runs: usize,
    pub avg_hits: f32,
    pub avg_first_hit_frame: Option<f32>,
    pub capped_runs: usize,
}

/// Speed sweep result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepResult {
    pub runs: Vec<RunResult>,
    pub by_speed: Vec<SpeedSummary>,
}

impl SweepResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group runs by speed, in the order speeds first appear
    pub fn calculate_stats(&mut self) {
        self.by_speed.clear();
        let mut speeds: Vec<f32> = Vec::new();
        for run in &self.runs {
            if !speeds.contains(&run.speed) {
                speeds.push(run.speed);
            }
        }

        for speed in speeds {
            let runs: Vec<&RunResult> = self.runs.iter().filter(|r| r.speed == speed).collect();
            let total = runs.len() as f32;
            let hits: u32 = runs.iter().map(|r| r.hits).sum();
            let first_hits: Vec<u64> = runs.iter().filter_map(|r| r.first_hit_frame).collect();
            let avg_first_hit_frame = if first_hits.is_empty() {
                None
            } else {
                Some(first_hits.iter().sum::<u64>() as f32 / first_hits.len() as f32)
            };

            self.by_speed.push(SpeedSummary {
                speed,
                runs: runs.len(),
                avg_hits: hits as f32 / total,
                avg_first_hit_frame,
                capped_runs: runs
                    .iter()
                    .filter(|r| r.end_reason == "population_cap")
                    .count(),
            });
        }
    }

    pub fn format_table(&self) -> String {
        let mut output = String::new();
        output.push_str("\nSpeed Sweep Results:\n\n");
        output.push_str(&format!(
            "{:>6} | {:>5} | {:>10} | {:>14} | {:>6}\n",
            "Speed", "Runs", "Avg Hits", "Avg 1st Hit", "Capped"
        ));
        output.push_str(&format!(
            "{:-<6}-+-{:-<5}-+-{:-<10}-+-{:-<14}-+-{:-<6}\n",
            "", "", "", "", ""
        ));

        for row in &self.by_speed {
            let first = row
                .avg_first_hit_frame
                .map(|f| format!("{:.1}", f))
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{:>6.1} | {:>5} | {:>10.1} | {:>14} | {:>6}\n",
                row.speed, row.runs, row.avg_hits, first, row.capped_runs
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Boundary;

    fn run(speed: f32, hits: u32, first: Option<u64>, reason: &str) -> RunResult {
        RunResult {
            seed: 0,
            speed,
            viewport: (100.0, 100.0),
            frames_run: 10,
            hits,
            final_population: hits as usize + 1,
            first_hit_frame: first,
            max_trail_len: 10,
            max_penetration: 0.0,
            end_reason: reason.to_string(),
            events: Vec::new(),
        }
    }

    #[test]
    fn test_observe_tracks_run() {
        let boundary = Boundary::from_viewport(120.0, 120.0).unwrap();
        let mut session = BounceSession::with_seed(boundary, 6.0, 3);
        let mut metrics = RunMetrics::new();
        for _ in 0..200 {
            let report = session.step();
            metrics.observe(&session, &report);
        }
        assert_eq!(metrics.frames, 200);
        assert_eq!(metrics.hits, session.hit_count);
        assert!(metrics.max_trail_len <= crate::constants::TRAIL_LENGTH);
        assert!(metrics.max_penetration <= 1e-3);
        if session.hit_count > 0 {
            assert!(metrics.first_hit_frame.is_some());
        }
    }

    #[test]
    fn test_sweep_grouping() {
        let mut sweep = SweepResult::new();
        sweep.runs = vec![
            run(2.0, 4, Some(10), "frames"),
            run(2.0, 6, None, "frames"),
            run(4.0, 30, Some(3), "population_cap"),
        ];
        sweep.calculate_stats();

        assert_eq!(sweep.by_speed.len(), 2);
        assert_eq!(sweep.by_speed[0].speed, 2.0);
        assert_eq!(sweep.by_speed[0].avg_hits, 5.0);
        assert_eq!(sweep.by_speed[0].avg_first_hit_frame, Some(10.0));
        assert_eq!(sweep.by_speed[1].capped_runs, 1);
        assert!(sweep.format_table().contains("Speed Sweep Results"));
    }
}
