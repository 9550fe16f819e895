//! Headless bounce simulator
//!
//! Runs sessions without a window and reports hit counts and population growth.
//!
//! Usage:
//!   cargo run --bin simulate -- --help
//!   cargo run --bin simulate -- --frames 1200 --speed 7 --seed 42
//!   cargo run --bin simulate -- --runs 50 --parallel 8 --db sim.db
//!   cargo run --bin simulate -- --speed-sweep 5 --speeds 1,3,5,8

use ringbounce::simulation::{SimConfig, run_simulation};

fn main() {
    let config = SimConfig::from_args();
    if let Err(e) = run_simulation(config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
