//! Headless simulation - steps sessions without rendering
//!
//! Provides batch runs (sequential or rayon-parallel), per-run metrics,
//! an SQLite results store with text reports, and the headless app builder shared with the
//! scenario tests.

pub mod app_builder;
pub mod config;
pub mod db;
pub mod metrics;
pub mod parallel;
pub mod report;
pub mod runner;

pub use app_builder::{HeadlessAppBuilder, HeadlessClock, headless_step};
pub use config::{SimConfig, SimMode};
pub use db::{RunFilter, RunSummary, SimDatabase};
pub use metrics::{RunMetrics, RunResult, SpeedSummary, SweepResult};
pub use parallel::{RunSpec, init_parallel, run_runs_parallel};
pub use report::format_report;
pub use runner::{config_boundary, run_run, run_session, run_simulation};
