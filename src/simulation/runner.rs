//! Simulation runner - headless sessions without rendering

use rand::Rng;
use std::io::Write;
use std::path::Path;

use crate::arena::Boundary;
use crate::events::{EventBuffer, EventBus};
use crate::session::BounceSession;
use crate::snapshot::SessionSnapshot;

use super::app_builder::HeadlessAppBuilder;
use super::config::{SimConfig, SimMode};
use super::db::SimDatabase;
use super::metrics::{RunMetrics, RunResult, SweepResult};
use super::parallel::{RunSpec, init_parallel, multi_run_specs, run_runs_parallel, sweep_specs};

/// Boundary for the configured viewport
pub fn config_boundary(config: &SimConfig) -> Result<Boundary, String> {
    Boundary::from_viewport(config.viewport_width, config.viewport_height).ok_or_else(|| {
        format!(
            "Invalid viewport {}x{}: both sides must be positive",
            config.viewport_width, config.viewport_height
        )
    })
}

/// Run one session to completion and keep its final state
pub fn run_session(
    config: &SimConfig,
    boundary: Boundary,
    speed: f32,
    seed: u64,
) -> (RunResult, BounceSession) {
    let session = BounceSession::with_seed(boundary, speed, seed);

    let mut events = EventBuffer::new();
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string();
    events.start_session(&timestamp);
    events.log_config(session.config_snapshot());

    let mut app = HeadlessAppBuilder::new()
        .with_session(session)
        .with_minimal_threads()
        .build();

    let mut end_reason = "frames";
    for _ in 0..config.frames {
        app.update();

        let world = app.world_mut();
        for bus_event in world.resource_mut::<EventBus>().drain() {
            events.log(bus_event.time_ms, bus_event.event);
        }

        let population = world.resource::<BounceSession>().population();
        if config.population_cap > 0 && population > config.population_cap {
            end_reason = "population_cap";
            break;
        }
    }

    let world = app.world();
    let metrics = world.resource::<RunMetrics>().clone();
    let session = world.resource::<BounceSession>().clone();

    let result = RunResult {
        seed,
        speed,
        viewport: (config.viewport_width, config.viewport_height),
        frames_run: session.frame,
        hits: session.hit_count,
        final_population: session.population(),
        first_hit_frame: metrics.first_hit_frame,
        max_trail_len: metrics.max_trail_len,
        max_penetration: if metrics.max_penetration.is_finite() {
            metrics.max_penetration
        } else {
            0.0
        },
        end_reason: end_reason.to_string(),
        events: events.events().to_vec(),
    };

    (result, session)
}

/// Run one session and return its result
pub fn run_run(config: &SimConfig, boundary: Boundary, speed: f32, seed: u64) -> RunResult {
    run_session(config, boundary, speed, seed).0
}

/// Main simulation entry point
pub fn run_simulation(config: SimConfig) -> Result<(), String> {
    let boundary = config_boundary(&config)?;
    let base_seed = config.seed.unwrap_or_else(|| rand::thread_rng().r#gen());

    let specs = match &config.mode {
        SimMode::Single => vec![RunSpec {
            speed: config.speed,
            seed: base_seed,
        }],
        SimMode::MultiRun { count } => multi_run_specs(&config, *count, base_seed),
        SimMode::SpeedSweep { runs_per_speed } => sweep_specs(&config, *runs_per_speed, base_seed),
    };

    if specs.is_empty() {
        return Err("Nothing to run".to_string());
    }

    if !config.quiet {
        println!(
            "Running {} run(s) of {} frames in a {}x{} viewport (base seed: {})",
            specs.len(),
            config.frames,
            config.viewport_width,
            config.viewport_height,
            base_seed
        );
    }

    // First run is kept in full for the optional snapshot
    let (first, final_session) = run_session(&config, boundary, specs[0].speed, specs[0].seed);
    if let Some(path) = &config.snapshot_path {
        let (json, png) = SessionSnapshot::capture(&final_session).save(Path::new(path))?;
        if !config.quiet {
            println!("Snapshot written to {} and {}", json.display(), png.display());
        }
    }

    let mut results = vec![first];
    let rest = &specs[1..];
    if config.parallel > 0 && !rest.is_empty() {
        init_parallel(config.parallel)?;
        results.extend(run_runs_parallel(&config, boundary, rest));
    } else {
        for (i, spec) in rest.iter().enumerate() {
            if !config.quiet {
                print!("\rRun {}/{}...", i + 2, specs.len());
                std::io::stdout().flush().ok();
            }
            results.push(run_run(&config, boundary, spec.speed, spec.seed));
        }
    }

    if !config.quiet && specs.len() > 1 {
        println!("\rCompleted {} runs.", specs.len());
    }

    if let Some(db_path) = &config.db_path {
        store_results(db_path, &config, &results)?;
        if !config.quiet {
            println!("Stored {} runs in {}", results.len(), db_path);
        }
    }

    match &config.mode {
        SimMode::Single => output_json(&results[0], &config),
        SimMode::MultiRun { count } => {
            let total_hits: u32 = results.iter().map(|r| r.hits).sum();
            let capped = results
                .iter()
                .filter(|r| r.end_reason == "population_cap")
                .count();
            println!(
                "\nHits: {} total, {:.1} per run ({} of {} runs hit the population cap)",
                total_hits,
                total_hits as f32 / *count as f32,
                capped,
                count
            );
            output_json(&results, &config)
        }
        SimMode::SpeedSweep { .. } => {
            let mut sweep = SweepResult::new();
            sweep.runs = results;
            sweep.calculate_stats();
            println!("{}", sweep.format_table());
            output_json(&sweep, &config)
        }
    }
}

fn store_results(db_path: &str, config: &SimConfig, results: &[RunResult]) -> Result<(), String> {
    let db = SimDatabase::open(Path::new(db_path))
        .map_err(|e| format!("Failed to open {}: {}", db_path, e))?;
    let config_json = serde_json::to_string(config).ok();
    let session_type = match config.mode {
        SimMode::Single => "single",
        SimMode::MultiRun { .. } => "multi_run",
        SimMode::SpeedSweep { .. } => "speed_sweep",
    };
    let session_id = db
        .create_session(session_type, config_json.as_deref())
        .map_err(|e| format!("Failed to create session in {}: {}", db_path, e))?;
    for result in results {
        db.insert_run(&session_id, result)
            .map_err(|e| format!("Failed to insert run into {}: {}", db_path, e))?;
    }
    Ok(())
}

fn output_json<T: serde::Serialize>(value: &T, config: &SimConfig) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize results: {}", e))?;

    if let Some(output_file) = &config.output_file {
        std::fs::write(output_file, &json)
            .map_err(|e| format!("Failed to write {}: {}", output_file, e))?;
        println!("Results written to {}", output_file);
    } else {
        println!("{}", json);
    }
    Ok(())
}
