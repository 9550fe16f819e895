//! Results report - reads a database written by `simulate --db`
//!
//! Usage:
//!   cargo run --bin analyze -- results.db
//!   cargo run --bin analyze -- results.db --speed 4 --limit 50
//!   cargo run --bin analyze -- results.db --session <ID> -o report.txt

use std::path::PathBuf;

use ringbounce::simulation::{RunFilter, SimDatabase, format_report};

fn main() {
    let config = AnalyzeConfig::from_args();

    if config.show_help {
        print_help();
        return;
    }

    if !config.db_path.exists() {
        println!("No database at {}", config.db_path.display());
        println!("\nTo store results, run simulations with --db:");
        println!("  cargo run --bin simulate -- --speed-sweep 5 --db results.db");
        std::process::exit(1);
    }

    let db = match SimDatabase::open(&config.db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open {}: {}", config.db_path.display(), e);
            std::process::exit(1);
        }
    };

    let report = match format_report(&db, &config.filter) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Failed to read {}: {}", config.db_path.display(), e);
            std::process::exit(1);
        }
    };
    println!("{}", report);

    if let Some(output_path) = &config.output_file {
        if let Err(e) = std::fs::write(output_path, &report) {
            eprintln!("Failed to write report: {}", e);
        } else {
            println!("Report written to {}", output_path.display());
        }
    }
}

/// Configuration for the analyze tool
struct AnalyzeConfig {
    db_path: PathBuf,
    filter: RunFilter,
    output_file: Option<PathBuf>,
    show_help: bool,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("results.db"),
            filter: RunFilter {
                limit: Some(20),
                ..Default::default()
            },
            output_file: None,
            show_help: false,
        }
    }
}

impl AnalyzeConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--session" => {
                    if i + 1 < args.len() {
                        config.filter.session_id = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                "--speed" => {
                    if i + 1 < args.len() {
                        config.filter.speed = args[i + 1].parse().ok();
                        i += 1;
                    }
                }
                "--limit" => {
                    if i + 1 < args.len() {
                        // 0 lists every run
                        config.filter.limit = args[i + 1].parse::<u32>().ok().filter(|&n| n > 0);
                        i += 1;
                    }
                }
                "--output" | "-o" => {
                    if i + 1 < args.len() {
                        config.output_file = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    }
                }
                "--help" | "-h" => {
                    config.show_help = true;
                }
                arg if !arg.starts_with('-') => {
                    config.db_path = PathBuf::from(arg);
                }
                _ => {}
            }
            i += 1;
        }

        config
    }
}

fn print_help() {
    println!(
        r#"Results report - summarize stored simulation runs

USAGE:
    cargo run --bin analyze -- [DB_PATH] [OPTIONS]

ARGUMENTS:
    DB_PATH             SQLite database path (default: results.db)

OPTIONS:
    --session <ID>      Only list runs from this session
    --speed <N>         Only list runs at this speed
    --limit <N>         List at most N runs (default: 20, 0 = all)
    --output, -o <FILE> Also write the report to a file
    --help, -h          Show this help
"#
    );
}
