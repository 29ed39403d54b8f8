//! Two-agent experiment harness.
//!
//! Builds two agents with identical parameters, wires them crosswise with
//! two unbounded FIFO queues and runs each on its own OS thread:
//!
//! ```text
//!            queue A
//!   Agent1 ----------> Agent2
//!          <----------
//!            queue B
//! ```
//!
//! Each agent sends before it receives, so neither ever waits on a message
//! that has not been enqueued yet. The queues are the only thing the two
//! threads share.
//!
//! # Determinism
//!
//! Each agent's channel RNG is seeded from the experiment seed mixed with
//! the agent's index, so the two channels inject uncorrelated noise while
//! the whole run stays reproducible. Thread scheduling does not affect the
//! result: every value an agent sees depends only on queue order.

use crate::agent::{validate_adapt_rate, Agent, AgentReport};
use crate::capacity::ChannelParameters;
use crate::error::{Error, Result};
use crate::trace::BehaviorLog;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::info;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Names given to the two agents, in wiring order.
pub const AGENT_NAMES: [&str; 2] = ["Agent1", "Agent2"];

/// Parameters for one experiment run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperimentConfig {
    /// Steps each agent runs (>= 1)
    pub iterations: usize,

    /// Per-message bit flip probability, in (0, 1]
    pub noise_level: f64,

    /// Fraction of the gap to the received value closed per step, in [0, 1].
    /// Rates outside that range are rejected rather than clamped, since
    /// they are the only way behavior could leave [0, 1].
    pub adapt_rate: f64,

    /// Capacity multiplier (> 0)
    pub bandwidth: f64,

    /// Base seed for both channels
    pub seed: u64,

    /// Pause after each step; zero disables it
    pub step_delay: Duration,
}

impl ExperimentConfig {
    /// Config with bandwidth 1, seed 0 and no step delay.
    pub fn new(iterations: usize, noise_level: f64, adapt_rate: f64) -> Self {
        Self {
            iterations,
            noise_level,
            adapt_rate,
            bandwidth: 1.0,
            seed: 0,
            step_delay: Duration::ZERO,
        }
    }

    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    /// Check every parameter and return the channel parameters.
    ///
    /// Noise must be in (0, 1] and small enough to stay under
    /// [`MAX_QUANTIZATION_LEVELS`](crate::capacity::MAX_QUANTIZATION_LEVELS);
    /// the adapt rate must be in [0, 1] (never clamped).
    ///
    /// # Errors
    /// `InvalidParameter` naming the first bad value.
    pub fn validate(&self) -> Result<ChannelParameters> {
        if self.iterations == 0 {
            return Err(Error::invalid("iterations must be >= 1"));
        }
        validate_adapt_rate(self.adapt_rate)?;

        let params = ChannelParameters::new(self.noise_level, self.bandwidth)?;
        // Surface level-count problems before any thread starts
        params.levels()?;
        Ok(params)
    }
}

/// Everything an experiment produced.
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    /// Channel capacity in bits per symbol
    pub capacity: f64,

    /// Quantization levels each agent used
    pub levels: usize,

    /// Reports in wiring order (Agent1, Agent2)
    pub agents: [AgentReport; 2],
}

impl ExperimentOutcome {
    /// The two behavior logs in wiring order.
    pub fn logs(&self) -> (&BehaviorLog, &BehaviorLog) {
        (&self.agents[0].log, &self.agents[1].log)
    }

    /// Consume the outcome, keeping only the logs.
    pub fn into_logs(self) -> (BehaviorLog, BehaviorLog) {
        let [first, second] = self.agents;
        (first.log, second.log)
    }
}

/// Derive an independent per-agent seed from the experiment seed.
pub fn agent_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(MIXING_CONSTANT)
}

/// Run two agents against each other for `config.iterations` steps.
///
/// Parameters are validated before anything is spawned. Returns once both
/// agent threads have finished.
///
/// # Errors
/// - `InvalidParameter` for bad configuration
/// - `Channel` if an agent thread panicked or lost its peer
/// - Any error an agent loop returned
pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentOutcome> {
    let params = config.validate()?;
    let capacity = params.capacity()?;
    let levels = params.levels()?;

    info!(
        iterations = config.iterations,
        noise_level = config.noise_level,
        adapt_rate = config.adapt_rate,
        bandwidth = config.bandwidth,
        seed = config.seed,
        capacity,
        levels,
        "starting experiment"
    );

    let build = |index: usize| -> Result<Agent> {
        let seed = agent_seed(config.seed, index);
        Ok(Agent::new(AGENT_NAMES[index], params, config.adapt_rate, seed)?
            .with_step_delay(config.step_delay))
    };
    let first = build(0)?;
    let second = build(1)?;

    // Agent1 writes A and reads B; Agent2 writes B and reads A
    let (a_tx, a_rx) = mpsc::channel();
    let (b_tx, b_rx) = mpsc::channel();
    let iterations = config.iterations;

    let first = thread::Builder::new()
        .name(AGENT_NAMES[0].to_string())
        .spawn(move || first.run(iterations, a_tx, b_rx))?;
    let second = thread::Builder::new()
        .name(AGENT_NAMES[1].to_string())
        .spawn(move || second.run(iterations, b_tx, a_rx))?;

    let first = join_agent(first, AGENT_NAMES[0]);
    let second = join_agent(second, AGENT_NAMES[1]);
    let agents = [first?, second?];

    info!(
        final_behavior_1 = ?agents[0].log.last_value(),
        final_behavior_2 = ?agents[1].log.last_value(),
        "experiment finished"
    );

    Ok(ExperimentOutcome {
        capacity,
        levels,
        agents,
    })
}

fn join_agent(
    handle: thread::JoinHandle<Result<AgentReport>>,
    name: &str,
) -> Result<AgentReport> {
    handle
        .join()
        .map_err(|_| Error::Channel(format!("{name} thread panicked")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ExperimentConfig::new(100, 0.1, 0.1);
        assert_eq!(config.bandwidth, 1.0);
        assert_eq!(config.seed, 0);
        assert!(config.step_delay.is_zero());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            ExperimentConfig::new(0, 0.1, 0.1),
            ExperimentConfig::new(10, 0.0, 0.1),
            ExperimentConfig::new(10, 1.2, 0.1),
            ExperimentConfig::new(10, 0.1, 2.0),
            ExperimentConfig::new(10, 0.1, 0.1).with_bandwidth(0.0),
            // 2^(log2(1 + 1e9)) far exceeds the level cap
            ExperimentConfig::new(10, 1e-9, 0.1),
        ];
        for config in bad {
            let err = run_experiment(&config).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter(_)), "{config:?}");
        }
    }

    #[test]
    fn test_agent_seeds_differ() {
        assert_ne!(agent_seed(0, 0), agent_seed(0, 1));
        assert_ne!(agent_seed(7, 0), agent_seed(8, 0));
        assert_eq!(agent_seed(7, 1), agent_seed(7, 1));
    }

    #[test]
    fn test_small_run() {
        let config = ExperimentConfig::new(10, 0.1, 0.1).with_seed(1);
        let outcome = run_experiment(&config).unwrap();
        assert_eq!(outcome.levels, 11);

        let (first, second) = outcome.logs();
        assert_eq!(first.agent(), "Agent1");
        assert_eq!(second.agent(), "Agent2");
        assert_eq!(first.len(), 10);
        assert_eq!(second.len(), 10);
    }

    #[test]
    fn test_reproducible() {
        let config = ExperimentConfig::new(50, 0.3, 0.2).with_seed(2024);
        let a = run_experiment(&config).unwrap().into_logs();
        let b = run_experiment(&config).unwrap().into_logs();
        assert_eq!(a, b);
    }
}
