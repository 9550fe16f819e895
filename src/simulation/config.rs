//! Simulation configuration

use serde::{Deserialize, Serialize};

/// Simulation mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum SimMode {
    /// Run a single session
    #[default]
    Single,
    /// Run multiple sessions with the same config, seeds derived from the base seed
    MultiRun { count: u32 },
    /// Run each speed in `speeds` (N runs each)
    SpeedSweep { runs_per_speed: u32 },
}

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub mode: SimMode,
    /// Frames to step per run
    pub frames: u64,
    /// Speed bound for the run
    pub speed: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// End a run early once the population exceeds this (0 = no cap)
    pub population_cap: usize,
    /// RNG seed for reproducibility (None = random)
    pub seed: Option<u64>,
    /// Speeds used by SpeedSweep (empty = 1..=10)
    pub speeds: Vec<f32>,
    /// Output file path (None = stdout)
    pub output_file: Option<String>,
    /// Suppress progress output
    pub quiet: bool,
    /// Number of parallel threads (0 = sequential, N = N threads)
    pub parallel: usize,
    /// Path to SQLite database for storing results
    pub db_path: Option<String>,
    /// Write `<path>.json` and `<path>.png` of the first run's final state
    pub snapshot_path: Option<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode: SimMode::Single,
            frames: 600,
            speed: 5.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
            population_cap: 5000,
            seed: None,
            speeds: Vec::new(),
            output_file: None,
            quiet: false,
            parallel: 0,
            db_path: None,
            snapshot_path: None,
        }
    }
}

/// Template simulation settings (checked into git)
pub const SIM_SETTINGS_TEMPLATE: &str = "config/simulation_settings.template.json";
/// Local simulation settings (gitignored, user's custom settings)
pub const SIM_SETTINGS_FILE: &str = "config/simulation_settings.json";

impl SimConfig {
    /// Load configuration from a JSON settings file
    pub fn from_file(path: &str) -> Result<Self, String> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))
    }

    /// Load configuration from default config files
    /// Priority: local settings > template settings > built-in defaults
    pub fn from_config_files() -> Self {
        if let Ok(config) = Self::from_file(SIM_SETTINGS_FILE) {
            return config;
        }
        if let Ok(config) = Self::from_file(SIM_SETTINGS_TEMPLATE) {
            return config;
        }
        Self::default()
    }

    /// Parse configuration from command line arguments
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        if args.iter().any(|a| a == "--help" || a == "-h") {
            print_help();
            std::process::exit(0);
        }

        // Start with config files as base
        let mut config = Self::from_config_files();

        // Explicit settings file replaces the base
        if let Some(path) = args
            .iter()
            .position(|a| a == "--settings")
            .and_then(|i| args.get(i + 1))
        {
            match Self::from_file(path) {
                Ok(loaded) => config = loaded,
                Err(e) => eprintln!("Warning: {}", e),
            }
        }

        config.apply_args(&args);
        config
    }

    /// Apply command line overrides on top of the current values
    pub fn apply_args(&mut self, args: &[String]) {
        let mut i = 1;
        while i < args.len() {
            let next = args.get(i + 1);
            match args[i].as_str() {
                "--settings" => {
                    // Already handled by from_args
                    i += 1;
                }
                "--frames" => {
                    if let Some(v) = next {
                        self.frames = v.parse().unwrap_or(self.frames);
                        i += 1;
                    }
                }
                "--speed" => {
                    if let Some(v) = next {
                        self.speed = v.parse().unwrap_or(self.speed);
                        i += 1;
                    }
                }
                "--viewport" => {
                    // WIDTHxHEIGHT
                    if let Some(v) = next {
                        if let Some((w, h)) = v.split_once('x')
                            && let (Ok(w), Ok(h)) = (w.parse(), h.parse())
                        {
                            self.viewport_width = w;
                            self.viewport_height = h;
                        } else {
                            eprintln!("Warning: bad --viewport '{}', expected WIDTHxHEIGHT", v);
                        }
                        i += 1;
                    }
                }
                "--cap" => {
                    if let Some(v) = next {
                        self.population_cap = v.parse().unwrap_or(self.population_cap);
                        i += 1;
                    }
                }
                "--runs" => {
                    if let Some(v) = next {
                        let count = v.parse().unwrap_or(1);
                        self.mode = SimMode::MultiRun { count };
                        i += 1;
                    }
                }
                "--speed-sweep" => {
                    let runs = if next.is_some_and(|v| !v.starts_with('-')) {
                        i += 1;
                        args[i].parse().unwrap_or(3)
                    } else {
                        3
                    };
                    self.mode = SimMode::SpeedSweep {
                        runs_per_speed: runs,
                    };
                }
                "--speeds" => {
                    if let Some(v) = next {
                        self.speeds = v
                            .split(',')
                            .filter_map(|s| s.trim().parse().ok())
                            .collect();
                        i += 1;
                    }
                }
                "--seed" => {
                    if let Some(v) = next {
                        self.seed = v.parse().ok();
                        i += 1;
                    }
                }
                "--output" => {
                    if let Some(v) = next {
                        self.output_file = Some(v.clone());
                        i += 1;
                    }
                }
                "--quiet" | "-q" => {
                    self.quiet = true;
                }
                "--parallel" => {
                    if let Some(v) = next {
                        self.parallel = v.parse().unwrap_or(0);
                        i += 1;
                    }
                }
                "--db" => {
                    if let Some(v) = next {
                        self.db_path = Some(v.clone());
                        i += 1;
                    }
                }
                "--snapshot" => {
                    if let Some(v) = next {
                        self.snapshot_path = Some(v.clone());
                        i += 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    /// Speeds a sweep runs over
    pub fn sweep_speeds(&self) -> Vec<f32> {
        if self.speeds.is_empty() {
            (1..=10).map(|s| s as f32).collect()
        } else {
            self.speeds.clone()
        }
    }
}

fn print_help() {
    println!(
        r#"Headless simulation - step bounce sessions without rendering and collect metrics

USAGE:
    cargo run --bin simulate -- [OPTIONS]

OPTIONS:
    --settings <FILE>   Load settings from JSON file (CLI args override file settings)
    --frames <N>        Frames per run (default: 600)
    --speed <V>         Speed bound (default: 5)
    --viewport <WxH>    Viewport the boundary is inscribed in (default: 800x600)
    --cap <N>           Stop a run once the population exceeds N (default: 5000, 0 = none)
    --runs <N>          Run N sessions with seeds derived from --seed
    --speed-sweep [N]   Run every speed in --speeds (N runs each, default: 3)
    --speeds <LIST>     Comma-separated speeds for the sweep (default: 1..10)
    --seed <N>          RNG seed for reproducibility
    --output <FILE>     Output JSON to file (default: stdout)
    --quiet, -q         Suppress progress output
    --parallel <N>      Run simulations in parallel with N threads
    --db <FILE>         Store results in SQLite database (read back with the analyze bin)
    --snapshot <PATH>   Write PATH.json and PATH.png of the first run's final frame
    --help, -h          Show this help

EXAMPLES:
    cargo run --bin simulate -- --frames 1200 --seed 7 --snapshot out/final
    cargo run --bin simulate -- --speed-sweep 5 --speeds "1,2,4,8" --parallel 8 --db runs.db
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("simulate")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_overrides() {
        let mut config = SimConfig::default();
        config.apply_args(&args(&[
            "--frames", "90", "--viewport", "300x200", "--runs", "4", "--seed", "11", "-q",
        ]));
        assert_eq!(config.frames, 90);
        assert_eq!(config.viewport_width, 300.0);
        assert_eq!(config.viewport_height, 200.0);
        assert_eq!(config.mode, SimMode::MultiRun { count: 4 });
        assert_eq!(config.seed, Some(11));
        assert!(config.quiet);
    }

    #[test]
    fn test_speed_sweep_default_count() {
        let mut config = SimConfig::default();
        config.apply_args(&args(&["--speed-sweep", "--speeds", "2, 4"]));
        assert_eq!(config.mode, SimMode::SpeedSweep { runs_per_speed: 3 });
        assert_eq!(config.sweep_speeds(), vec![2.0, 4.0]);
        assert_eq!(SimConfig::default().sweep_speeds().len(), 10);
    }

    #[test]
    fn test_partial_json() {
        let config: SimConfig = serde_json::from_str(r#"{"frames": 42, "parallel": 8}"#).unwrap();
        assert_eq!(config.frames, 42);
        assert_eq!(config.parallel, 8);
        assert_eq!(config.speed, 5.0);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = SimConfig::from_file("config/nope.json").unwrap_err();
        assert!(err.starts_with("Failed to read config/nope.json"));
    }
}
