//! Noisy binary channel with single-bit parity.
//!
//! Every message is a codeword followed by one even-parity bit. With
//! probability `noise_level` the channel flips exactly one bit of the
//! message, chosen uniformly over the whole thing (parity bit included).
//! At most one bit is ever flipped, so the receiver's parity check catches
//! every corruption the channel injects.
//!
//! # Determinism
//!
//! All randomness comes from a seeded ChaCha8 RNG owned by the channel.
//! Given the same seed and inputs, outputs are bit-identical.

use crate::bits::BitString;
use crate::error::{Error, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Result of pushing one codeword through the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmission {
    /// Codeword + parity bit, possibly with one bit flipped
    pub message: BitString,

    /// Index of the flipped bit, if the channel injected an error
    pub flipped: Option<usize>,
}

/// Receiver's view of one message after the parity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reception {
    /// Message with the trailing parity bit stripped
    pub payload: BitString,

    /// True iff the payload's parity equals the trailing bit
    pub parity_ok: bool,
}

/// Sending half of a noisy channel.
///
/// # Thread Safety
/// Owns its RNG; one instance per sending agent.
#[derive(Debug, Clone)]
pub struct NoisyChannel {
    noise_level: f64,
    rng: ChaCha8Rng,
}

impl NoisyChannel {
    /// Create a channel that corrupts messages with probability `noise_level`.
    ///
    /// Zero is accepted here (a perfect channel) even though capacity
    /// estimation requires a strictly positive noise level.
    ///
    /// # Errors
    /// `InvalidParameter` if `noise_level` is not in [0, 1].
    pub fn new(noise_level: f64, seed: u64) -> Result<Self> {
        if !(0.0..=1.0).contains(&noise_level) {
            return Err(Error::invalid(format!(
                "channel noise level must be in [0, 1], got {noise_level}"
            )));
        }

        Ok(Self {
            noise_level,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Append the parity bit and maybe flip one bit.
    ///
    /// One uniform draw per message decides whether to corrupt it; a second
    /// draw picks the index.
    pub fn transmit(&mut self, codeword: &BitString) -> Result<Transmission> {
        let mut message = codeword.with_parity();

        let roll: f64 = self.rng.gen();
        if roll >= self.noise_level {
            return Ok(Transmission {
                message,
                flipped: None,
            });
        }

        let index = self.rng.gen_range(0..message.len());
        message.flip(index)?;

        Ok(Transmission {
            message,
            flipped: Some(index),
        })
    }

    /// Split a message into payload and parity verdict.
    ///
    /// An empty message has no parity bit and always fails the check.
    pub fn receive(message: &BitString) -> Reception {
        let payload = message.without_last();
        let parity_ok = message
            .last()
            .map_or(false, |parity| payload.parity() == parity);

        Reception { payload, parity_ok }
    }
}
