//! Text reports over a results database

use rusqlite::Result;

use super::db::{RunFilter, SimDatabase};

/// Totals, average hits per speed, and the runs matching `filter`
pub fn format_report(db: &SimDatabase, filter: &RunFilter) -> Result<String> {
    let mut output = String::new();
    output.push_str(&format!(
        "Results database: {} session(s), {} run(s)\n",
        db.session_count()?,
        db.run_count()?
    ));

    let speeds = db.speeds()?;
    if speeds.is_empty() {
        output.push_str("\nNo runs stored.\n");
        return Ok(output);
    }

    output.push_str("\nAverage hits per speed:\n\n");
    output.push_str(&format!("{:>6} | {:>10}\n", "Speed", "Avg Hits"));
    output.push_str(&format!("{:-<6}-+-{:-<10}\n", "", ""));
    for speed in speeds {
        if let Some(avg) = db.avg_hits_for_speed(speed)? {
            output.push_str(&format!("{:>6.1} | {:>10.1}\n", speed, avg));
        }
    }

    let runs = db.query_runs(filter)?;
    output.push_str(&format!("\nRuns ({} shown):\n\n", runs.len()));
    output.push_str(&format!(
        "{:>5} | {:>20} | {:>6} | {:>7} | {:>6} | {:>6} | {:>6} | {}\n",
        "ID", "Seed", "Speed", "Frames", "Hits", "Pop", "Events", "End"
    ));
    for run in &runs {
        output.push_str(&format!(
            "{:>5} | {:>20} | {:>6.1} | {:>7} | {:>6} | {:>6} | {:>6} | {}\n",
            run.id,
            run.seed,
            run.speed,
            run.frames_run,
            run.hits,
            run.final_population,
            db.event_count(run.id)?,
            run.end_reason
        ));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::BounceEvent;
    use crate::simulation::RunResult;

    fn result(seed: u64, speed: f32, hits: u32) -> RunResult {
        RunResult {
            seed,
            speed,
            viewport: (200.0, 200.0),
            frames_run: 120,
            hits,
            final_population: hits as usize + 1,
            first_hit_frame: None,
            max_trail_len: 50,
            max_penetration: 0.0,
            end_reason: "frames".to_string(),
            events: vec![(0, BounceEvent::Reset), (16, BounceEvent::Reset)],
        }
    }

    #[test]
    fn test_empty_database_report() {
        let db = SimDatabase::open_in_memory().unwrap();
        let report = format_report(&db, &RunFilter::default()).unwrap();
        assert!(report.contains("0 session(s), 0 run(s)"));
        assert!(report.contains("No runs stored."));
    }

    #[test]
    fn test_report_lists_speed_averages_and_runs() {
        let db = SimDatabase::open_in_memory().unwrap();
        let session = db.create_session("speed_sweep", None).unwrap();
        db.insert_run(&session, &result(1, 3.0, 2)).unwrap();
        db.insert_run(&session, &result(2, 3.0, 4)).unwrap();
        db.insert_run(&session, &result(3, 7.0, 9)).unwrap();

        let filter = RunFilter {
            limit: Some(2),
            ..Default::default()
        };
        let report = format_report(&db, &filter).unwrap();

        assert!(report.contains("1 session(s), 3 run(s)"));
        assert!(report.contains("   3.0 |        3.0"));
        assert!(report.contains("   7.0 |        9.0"));
        assert!(report.contains("Runs (2 shown)"));
        // Two events stored per run
        let run_line = report
            .lines()
            .find(|l| l.trim_start().starts_with("1 |"))
            .unwrap();
        assert!(run_line.contains("|      2 | frames"));
    }
}
