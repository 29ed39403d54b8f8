//! Configuration for the infochannel application.
//!
//! Handles parsing command-line arguments and filling in defaults.
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments, reproducing the reference run
//! (100 steps, noise 0.1, adapt rate 0.1). The seed is drawn from the clock
//! unless given and is always printed so any run can be repeated.

use infochannel_core::ExperimentConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Experiment ===
    /// Parameters handed to the core
    pub experiment: ExperimentConfig,

    // === Output ===
    /// Where to write the behavior trace as CSV (None = don't write)
    pub csv_file: Option<PathBuf>,

    // === Behavior ===
    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Parse configuration from command-line arguments.
    ///
    /// Returns `Ok(None)` when `--help` was requested and printed.
    /// If --seed is not provided, a time-based seed is used.
    pub fn from_args(args: &[String]) -> Result<Option<Self>, String> {
        let mut iterations: Option<usize> = None;
        let mut noise_level: Option<f64> = None;
        let mut adapt_rate: Option<f64> = None;
        let mut bandwidth: Option<f64> = None;
        let mut seed: Option<u64> = None;
        let mut delay_ms: Option<u64> = None;
        let mut csv_file: Option<PathBuf> = None;
        let mut print_config = false;
        let mut print_metrics = true;

        let mut args = args.iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--iterations" => iterations = Some(parse_value(&mut args, arg)?),
                "--noise" => noise_level = Some(parse_value(&mut args, arg)?),
                "--adapt-rate" => adapt_rate = Some(parse_value(&mut args, arg)?),
                "--bandwidth" => bandwidth = Some(parse_value(&mut args, arg)?),
                "--seed" => seed = Some(parse_value(&mut args, arg)?),
                "--delay-ms" => delay_ms = Some(parse_value(&mut args, arg)?),
                "--no-delay" => delay_ms = Some(0),
                "--csv" => {
                    let path = args.next().ok_or("--csv requires a path")?;
                    csv_file = Some(PathBuf::from(path));
                }
                "--print-config" => print_config = true,
                "--no-metrics" => print_metrics = false,
                "--help" | "-h" => {
                    print_help();
                    return Ok(None);
                }
                other => return Err(format!("unknown argument: {other}")),
            }
        }

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |t| t.as_millis() as u64)
        });

        let experiment = ExperimentConfig::new(
            iterations.unwrap_or(100),
            noise_level.unwrap_or(0.1),
            adapt_rate.unwrap_or(0.1),
        )
        .with_bandwidth(bandwidth.unwrap_or(1.0))
        .with_seed(seed)
        .with_step_delay(Duration::from_millis(delay_ms.unwrap_or(10)));

        Ok(Some(Config {
            experiment,
            csv_file,
            print_config,
            print_metrics,
        }))
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        let e = &self.experiment;
        println!("=== Configuration ===");
        println!("Iterations: {}", e.iterations);
        println!("Noise level: {}", e.noise_level);
        println!("Adapt rate: {}", e.adapt_rate);
        println!("Bandwidth: {}", e.bandwidth);
        println!("Seed: {}", e.seed);
        println!("Step delay: {} ms", e.step_delay.as_millis());
        match &self.csv_file {
            Some(path) => println!("Trace CSV: {}", path.display()),
            None => println!("Trace CSV: (none)"),
        }
        println!();
    }
}

/// Take the next argument as the value of `flag` and parse it.
fn parse_value<'a, T: std::str::FromStr>(
    args: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<T, String> {
    let raw = args
        .next()
        .ok_or_else(|| format!("{flag} requires a value"))?;
    raw.parse()
        .map_err(|_| format!("invalid value for {flag}: {raw}"))
}

fn print_help() {
    println!("infochannel: two agents adapting over a Huffman-coded noisy channel");
    println!();
    println!("USAGE:");
    println!("    infochannel [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --iterations <N>     Steps per agent (default: 100)");
    println!("    --noise <P>          Bit flip probability per message, 0-1 exclusive of 0 (default: 0.1)");
    println!("    --adapt-rate <R>     Adaptation rate 0-1 (default: 0.1)");
    println!("    --bandwidth <B>      Capacity multiplier (default: 1.0)");
    println!("    --seed <N>           Random seed for determinism (default: time-based)");
    println!();
    println!("    --delay-ms <MS>      Pause after every step (default: 10)");
    println!("    --no-delay           Same as --delay-ms 0");
    println!("    --csv <PATH>         Write the behavior trace as CSV");
    println!();
    println!("    --print-config       Print resolved configuration");
    println!("    --no-metrics         Don't print per-agent channel summary");
    println!("    --help, -h           Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    infochannel                              # Reference run");
    println!("    infochannel --seed 42 --no-delay         # Fast deterministic run");
    println!("    infochannel --noise 0.5 --csv trace.csv  # Noisy run, export trace");
    println!();
}
