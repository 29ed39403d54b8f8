//! Agents that exchange and adapt a scalar behavior.
//!
//! # Step cycle
//!
//! Starting from behavior 0.5, every step runs:
//!
//! 1. **Send**: quantize behavior to a symbol in `[0, levels)`, Huffman
//!    encode it, push it through the noisy channel, enqueue the message.
//! 2. **Receive**: block on the inbound queue, then check parity.
//!    - Parity consistent: take the neutral value 0.5. The payload is not
//!      decoded on this branch.
//!    - Parity mismatch: strip the parity bit and try to decode what is
//!      left. A match gives `symbol / (levels - 1)`; no match gives the
//!      midpoint symbol `floor(levels / 2)` scaled the same way.
//! 3. **Adapt**: move behavior toward the received value by `adapt_rate`
//!    and log the result.
//!
//! Note the inversion in step 2: a clean message is ignored and only
//! corrupted messages carry information. This mirrors the protocol being
//! modelled and is kept as-is.

use crate::bits::BitString;
use crate::capacity::ChannelParameters;
use crate::channel::NoisyChannel;
use crate::error::{Error, HuffmanError, Result};
use crate::huffman::Codebook;
use crate::metrics::ChannelStats;
use crate::trace::BehaviorLog;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;
use tracing::{debug, warn};

/// Behavior every agent starts from.
pub const INITIAL_BEHAVIOR: f64 = 0.5;

/// Value taken when an inbound message passes the parity check.
pub const NEUTRAL_VALUE: f64 = 0.5;

/// What an agent hands back when its loop finishes.
#[derive(Debug, Clone)]
pub struct AgentReport {
    /// One entry per completed step
    pub log: BehaviorLog,

    /// Message counters
    pub stats: ChannelStats,
}

/// A single agent: behavior state, code table, outbound channel noise.
///
/// All state is owned; an agent is moved onto its own thread and never
/// shared.
#[derive(Debug)]
pub struct Agent {
    name: String,
    behavior: f64,
    adapt_rate: f64,
    levels: usize,
    codebook: Codebook,
    channel: NoisyChannel,
    step_delay: Duration,
    log: BehaviorLog,
    stats: ChannelStats,
}

impl Agent {
    /// Build an agent whose code table is sized by `params`' capacity.
    ///
    /// `adapt_rate` is validated, not clamped: a rate outside [0, 1] could
    /// push behavior outside [0, 1], so it is refused up front.
    ///
    /// # Errors
    /// `InvalidParameter` if `adapt_rate` is not in [0, 1] or the channel
    /// parameters are invalid.
    pub fn new(
        name: impl Into<String>,
        params: ChannelParameters,
        adapt_rate: f64,
        seed: u64,
    ) -> Result<Self> {
        validate_adapt_rate(adapt_rate)?;

        let levels = params.levels()?;
        let codebook = Codebook::uniform(levels)?;
        let channel = NoisyChannel::new(params.noise_level, seed)?;
        let name = name.into();

        Ok(Self {
            log: BehaviorLog::new(name.clone()),
            name,
            behavior: INITIAL_BEHAVIOR,
            adapt_rate,
            levels,
            codebook,
            channel,
            step_delay: Duration::ZERO,
            stats: ChannelStats::default(),
        })
    }

    /// Sleep for `delay` after every step.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current behavior.
    pub fn behavior(&self) -> f64 {
        self.behavior
    }

    /// Alphabet size.
    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn codebook(&self) -> &Codebook {
        &self.codebook
    }

    pub fn log(&self) -> &BehaviorLog {
        &self.log
    }

    pub fn stats(&self) -> &ChannelStats {
        &self.stats
    }

    /// Symbol for the current behavior: `floor(behavior * (levels - 1))`,
    /// clamped into the alphabet.
    pub fn quantize(&self) -> u32 {
        let top = (self.levels - 1) as f64;
        (self.behavior * top).floor().clamp(0.0, top) as u32
    }

    /// Behavior value a symbol stands for.
    ///
    /// With a single level there is nothing to scale by, so the lone symbol
    /// stands for the midpoint.
    pub fn symbol_value(&self, symbol: u32) -> f64 {
        if self.levels <= 1 {
            return NEUTRAL_VALUE;
        }
        f64::from(symbol) / (self.levels - 1) as f64
    }

    /// Send phase: quantize, encode and transmit the current behavior.
    pub fn prepare_message(&mut self) -> Result<BitString> {
        let symbol = self.quantize();
        // Quantize keeps symbols inside the table; a miss here is a bug
        let codeword = self.codebook.encode(symbol)?;
        let sent = self.channel.transmit(codeword)?;

        self.stats.messages_sent += 1;
        if let Some(index) = sent.flipped {
            self.stats.messages_corrupted += 1;
            debug!(agent = %self.name, symbol, index, "channel flipped a bit");
        }

        Ok(sent.message)
    }

    /// Receive phase: turn an inbound message into a behavior value.
    pub fn interpret(&mut self, message: &BitString) -> Result<f64> {
        self.stats.messages_received += 1;

        let reception = NoisyChannel::receive(message);
        if reception.parity_ok {
            self.stats.parity_passes += 1;
            return Ok(NEUTRAL_VALUE);
        }

        self.stats.parity_failures += 1;
        match self.codebook.decode(&reception.payload) {
            Ok(symbol) => {
                self.stats.decodes_recovered += 1;
                Ok(self.symbol_value(symbol))
            }
            Err(Error::Huffman(HuffmanError::UnknownCodeword { .. })) => {
                self.stats.decode_fallbacks += 1;
                Ok(self.symbol_value((self.levels / 2) as u32))
            }
            Err(e) => Err(e),
        }
    }

    /// Adapt phase: move toward `received` and log the new behavior.
    pub fn adapt(&mut self, step: usize, received: f64) {
        self.behavior += self.adapt_rate * (received - self.behavior);
        self.log.record(step, self.behavior);
    }

    /// Run one full send/receive/adapt cycle.
    ///
    /// Blocks until the peer's message for this step arrives.
    pub fn step(
        &mut self,
        step: usize,
        outbound: &Sender<BitString>,
        inbound: &Receiver<BitString>,
    ) -> Result<()> {
        let message = self.prepare_message()?;
        outbound.send(message).map_err(|_| {
            warn!(agent = %self.name, step, "peer hung up before send");
            Error::Channel(format!("{}: outbound channel closed", self.name))
        })?;

        let incoming = inbound.recv().map_err(|_| {
            warn!(agent = %self.name, step, "peer hung up before receive");
            Error::Channel(format!("{}: inbound channel closed", self.name))
        })?;

        let received = self.interpret(&incoming)?;
        self.adapt(step, received);

        debug!(
            agent = %self.name,
            step,
            bits = %incoming,
            received,
            behavior = self.behavior,
            "step complete"
        );

        if !self.step_delay.is_zero() {
            std::thread::sleep(self.step_delay);
        }

        Ok(())
    }

    /// Run `iterations` steps and hand back the log and counters.
    pub fn run(
        mut self,
        iterations: usize,
        outbound: Sender<BitString>,
        inbound: Receiver<BitString>,
    ) -> Result<AgentReport> {
        for step in 0..iterations {
            self.step(step, &outbound, &inbound)?;
        }

        Ok(AgentReport {
            log: self.log,
            stats: self.stats,
        })
    }
}

/// Checks the adapt rate keeps behavior inside [0, 1].
pub(crate) fn validate_adapt_rate(adapt_rate: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&adapt_rate) {
        return Err(Error::invalid(format!(
            "adapt rate must be in [0, 1], got {adapt_rate}"
        )));
    }
    Ok(())
}
