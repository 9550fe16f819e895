//! Parallel simulation execution
//!
//! Uses Rayon to run multiple sessions concurrently.
//! Each session runs in its own Bevy app with minimal threading
//! to avoid hitting OS thread limits.

use rayon::prelude::*;

use crate::arena::Boundary;

use super::config::SimConfig;
use super::metrics::RunResult;
use super::runner::run_run;

/// One run in a batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSpec {
    pub speed: f32,
    pub seed: u64,
}

/// Initialize parallel execution with the given thread count.
/// Call this once at startup before running parallel simulations.
pub fn init_parallel(threads: usize) -> Result<(), String> {
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| format!("Failed to initialize Rayon thread pool: {}", e))?;
    }
    // threads == 0 keeps Rayon's default (auto-detect)
    Ok(())
}

/// `count` runs at the config speed, seeds `base_seed + i`
pub fn multi_run_specs(config: &SimConfig, count: u32, base_seed: u64) -> Vec<RunSpec> {
    (0..count)
        .map(|i| RunSpec {
            speed: config.speed,
            seed: base_seed.wrapping_add(i as u64),
        })
        .collect()
}

/// `runs_per_speed` runs for each sweep speed, seeds numbered across the sweep
pub fn sweep_specs(config: &SimConfig, runs_per_speed: u32, base_seed: u64) -> Vec<RunSpec> {
    let mut specs = Vec::new();
    let mut run_num = 0u64;
    for speed in config.sweep_speeds() {
        for _ in 0..runs_per_speed {
            specs.push(RunSpec {
                speed,
                seed: base_seed.wrapping_add(run_num),
            });
            run_num += 1;
        }
    }
    specs
}

/// Run every spec in parallel. Results come back in spec order.
pub fn run_runs_parallel(
    config: &SimConfig,
    boundary: Boundary,
    specs: &[RunSpec],
) -> Vec<RunResult> {
    specs
        .par_iter()
        .map(|spec| run_run(config, boundary, spec.speed, spec.seed))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_specs_cover_every_speed() {
        let config = SimConfig {
            speeds: vec![1.0, 3.0],
            ..Default::default()
        };
        let specs = sweep_specs(&config, 2, 100);
        assert_eq!(specs.len(), 4);
        assert_eq!(specs[0], RunSpec { speed: 1.0, seed: 100 });
        assert_eq!(specs[3], RunSpec { speed: 3.0, seed: 103 });
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = SimConfig {
            frames: 120,
            ..Default::default()
        };
        let boundary = Boundary::new(bevy::math::Vec2::new(100.0, 100.0), 100.0);
        let specs = multi_run_specs(&config, 4, 7);

        let parallel = run_runs_parallel(&config, boundary, &specs);
        assert_eq!(parallel.len(), 4);
        for (spec, result) in specs.iter().zip(&parallel) {
            let sequential = run_run(&config, boundary, spec.speed, spec.seed);
            assert_eq!(result.seed, spec.seed);
            assert_eq!(result.hits, sequential.hits);
            assert_eq!(result.final_population, sequential.final_population);
        }
    }
}
