//! Scenario test runner CLI
//!
//! Usage:
//!   cargo run --bin test-scenarios                    # Run all scenarios
//!   cargo run --bin test-scenarios -- resize          # Run scenarios whose file name contains "resize"
//!   cargo run --bin test-scenarios -- --verbose       # Show descriptions and full failure details

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ringbounce::testing::{SCENARIOS_DIR, TestResult, parse_scenario_file, run_scenario};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut verbose = false;
    let mut filter: Option<String> = None;

    for arg in &args[1..] {
        if arg == "--verbose" || arg == "-v" {
            verbose = true;
        } else if !arg.starts_with('-') {
            filter = Some(arg.clone());
        }
    }

    println!("Bounce Scenarios");
    println!("================\n");

    let scenarios_path = Path::new(SCENARIOS_DIR);
    let files = match discover_scenarios(scenarios_path, filter.as_deref()) {
        Ok(files) => files,
        Err(e) => {
            println!("{}", e);
            println!("Create scenario files in {}/", SCENARIOS_DIR);
            std::process::exit(1);
        }
    };

    if files.is_empty() {
        println!("No scenario files found.");
        if let Some(f) = filter {
            println!("Filter: {}", f);
        }
        std::process::exit(1);
    }

    let mut passed = 0;
    let mut failed = 0;
    let mut errors = 0;

    for path in &files {
        let file_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let result = match parse_scenario_file(path) {
            Ok(scenario) => {
                if verbose && let Some(description) = &scenario.description {
                    println!("  # {}", description);
                }
                run_scenario(&scenario)
            }
            Err(message) => TestResult::Error { message },
        };

        match &result {
            TestResult::Pass { .. } => passed += 1,
            TestResult::Fail { .. } => failed += 1,
            TestResult::Error { .. } => errors += 1,
        }

        print_result(&file_name, &result, verbose);
    }

    println!("\n================");
    println!(
        "Results: {} passed, {} failed, {} errors",
        passed, failed, errors
    );

    if failed > 0 || errors > 0 {
        std::process::exit(1);
    }
}

/// Sorted `.toml` files directly under `dir`, optionally filtered by name
fn discover_scenarios(dir: &Path, filter: Option<&str>) -> Result<Vec<PathBuf>, String> {
    let entries =
        fs::read_dir(dir).map_err(|e| format!("Failed to read {}: {}", dir.display(), e))?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|e| e == "toml"))
        .filter(|path| {
            filter.is_none_or(|f| {
                path.file_name()
                    .is_some_and(|name| name.to_string_lossy().contains(f))
            })
        })
        .collect();
    files.sort();
    Ok(files)
}

fn print_result(name: &str, result: &TestResult, verbose: bool) {
    let dots = ".".repeat(40 - name.len().min(39));

    match result {
        TestResult::Pass { frames } => {
            println!("  {} {} PASS ({} frames)", name, dots, frames);
        }
        TestResult::Fail { error } => {
            println!("  {} {} FAIL", name, dots);
            if verbose {
                println!("    {}", error);
            } else {
                println!("    {}", error.message);
            }
        }
        TestResult::Error { message } => {
            println!("  {} {} ERROR", name, dots);
            println!("    {}", message);
        }
    }
}
