//! infochannel: run the two-agent experiment from the command line.
//!
//! Resolves configuration, runs both agents to completion, then reports the
//! final behaviors, per-agent channel counters and (optionally) writes the
//! behavior trace as CSV for plotting or analysis elsewhere.

mod config;

use config::Config;
use infochannel_core::{run_experiment, trace};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(Some(config)) => config,
        Ok(None) => return ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {msg}");
            eprintln!("run with --help for usage");
            return ExitCode::from(2);
        }
    };

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "experiment failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> infochannel_core::Result<()> {
    let outcome = run_experiment(&config.experiment)?;

    println!(
        "Capacity: {:.3} bits/symbol, {} quantization levels",
        outcome.capacity, outcome.levels
    );
    for report in &outcome.agents {
        if let Some(value) = report.log.last_value() {
            println!("{} final behavior: {value:.4}", report.log.agent());
        }
    }
    println!();

    if config.print_metrics {
        for report in &outcome.agents {
            report.stats.print_summary(report.log.agent());
        }
    }

    if let Some(path) = &config.csv_file {
        let (first, second) = outcome.logs();
        trace::write_csv(path, &[first, second])?;
        info!(path = %path.display(), rows = first.len() + second.len(), "wrote behavior trace");
    }

    Ok(())
}
