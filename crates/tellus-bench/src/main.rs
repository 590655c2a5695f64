use std::path::PathBuf;
use std::process;

use tellus_bench::report;
use tellus_bench::runner::BenchmarkRunner;
use tellus_bench::scenes;
use tellus_core::config::ViewerConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut tick_count = 120u32;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args.get(i + 1);
        match (flag, value) {
            ("--baseline", Some(v)) => baseline_path = Some(PathBuf::from(v)),
            ("--output", Some(v)) => output_path = Some(PathBuf::from(v)),
            ("--config", Some(v)) => config_path = Some(PathBuf::from(v)),
            ("--regression-threshold", Some(v)) => {
                regression_threshold = v.parse().unwrap_or_else(|_| {
                    eprintln!("invalid --regression-threshold value: {v}");
                    process::exit(1);
                })
            }
            ("--ticks", Some(v)) => {
                tick_count = v.parse().unwrap_or_else(|_| {
                    eprintln!("invalid --ticks value: {v}");
                    process::exit(1);
                })
            }
            ("--help" | "-h", _) => {
                eprintln!("Usage: bench-runner [OPTIONS]");
                eprintln!("  --baseline <path>              Load baseline JSON for comparison");
                eprintln!("  --output <path>                Save current results as JSON baseline");
                eprintln!("  --config <path>                Viewer config RON (default: built-in)");
                eprintln!(
                    "  --regression-threshold <pct>   Regression threshold percentage (default: 10)"
                );
                eprintln!("  --ticks <n>                    Ticks per scene (default: 120)");
                process::exit(0);
            }
            (other, _) => {
                eprintln!("Unknown or incomplete argument: {other}");
                process::exit(1);
            }
        }
        i += 2;
    }

    let config = match &config_path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(contents) => ViewerConfig::from_ron_str_or_default(&contents),
            Err(e) => {
                log::warn!("Cannot read {}: {e}; using defaults", path.display());
                ViewerConfig::default()
            }
        },
        None => ViewerConfig::default(),
    };

    log::info!("Initializing GPU...");
    let runner = match BenchmarkRunner::new(tick_count, config) {
        Ok(runner) => runner,
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        }
    };

    let mut results = Vec::new();
    for scene in &scenes::standard_scenes() {
        match runner.run_scene(scene) {
            Ok(result) => results.push(result),
            Err(e) => {
                log::error!("Scene '{}' failed: {e}", scene.name);
                process::exit(1);
            }
        }
    }

    println!("\n## Benchmark Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: format!("bench-{}", process::id()),
            results: results.clone(),
        };
        match report::save_baseline(path, &baseline) {
            Ok(()) => log::info!("Saved baseline to {}", path.display()),
            Err(e) => log::error!("Failed to save baseline to {}: {e}", path.display()),
        }
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Benchmark complete.");
}
