//! Channel capacity and quantization level count.
//!
//! Capacity follows Shannon's formula with the noise level standing in for
//! the noise-to-signal ratio:
//!
//! ```text
//! C = B * log2(1 + 1/noise)
//! ```
//!
//! The number of quantization levels an agent can address is `2^C`,
//! truncated. A capacity below one bit still yields a single level.
//!
//! # Example
//! ```
//! use infochannel_core::capacity::{estimate_capacity, quantization_levels};
//!
//! let capacity = estimate_capacity(0.1, 1.0).unwrap();
//! assert!((capacity - 3.459).abs() < 1e-3);
//! assert_eq!(quantization_levels(capacity).unwrap(), 11);
//! ```

use crate::error::{Error, Result};

/// Upper bound on the alphabet size a code table may be built for.
///
/// Noise levels near zero push capacity (and so `2^C`) without limit. At
/// 2^24 symbols the two agents' tables take a few GiB; anything noisier
/// than about 6e-8 fits.
pub const MAX_QUANTIZATION_LEVELS: usize = 1 << 24;

/// Estimate channel capacity in bits per symbol.
///
/// # Errors
/// `InvalidParameter` if `noise_level` is not in (0, 1] or `bandwidth` is
/// not a finite positive number.
pub fn estimate_capacity(noise_level: f64, bandwidth: f64) -> Result<f64> {
    validate_noise_level(noise_level)?;
    if !bandwidth.is_finite() || bandwidth <= 0.0 {
        return Err(Error::invalid(format!(
            "bandwidth must be finite and > 0, got {bandwidth}"
        )));
    }

    Ok(bandwidth * (1.0 + 1.0 / noise_level).log2())
}

/// Number of quantization levels addressable at `capacity` bits.
///
/// Returns `max(1, floor(2^capacity))`.
///
/// # Errors
/// `InvalidParameter` if `capacity` is negative or non-finite, or the level
/// count would exceed [`MAX_QUANTIZATION_LEVELS`].
pub fn quantization_levels(capacity: f64) -> Result<usize> {
    if !capacity.is_finite() || capacity < 0.0 {
        return Err(Error::invalid(format!(
            "capacity must be finite and >= 0, got {capacity}"
        )));
    }

    let levels = 2f64.powf(capacity).floor();
    if levels > MAX_QUANTIZATION_LEVELS as f64 {
        return Err(Error::invalid(format!(
            "capacity {capacity:.3} bits needs {levels} levels, max is {MAX_QUANTIZATION_LEVELS}"
        )));
    }

    Ok((levels as usize).max(1))
}

/// Checks `noise_level` is a probability in (0, 1].
pub(crate) fn validate_noise_level(noise_level: f64) -> Result<()> {
    if !noise_level.is_finite() || noise_level <= 0.0 || noise_level > 1.0 {
        return Err(Error::invalid(format!(
            "noise level must be in (0, 1], got {noise_level}"
        )));
    }
    Ok(())
}

/// Immutable physical parameters of a channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelParameters {
    /// Probability that a message has one bit flipped, in (0, 1]
    pub noise_level: f64,

    /// Bandwidth multiplier on capacity, > 0
    pub bandwidth: f64,
}

impl ChannelParameters {
    /// Validate and build channel parameters.
    pub fn new(noise_level: f64, bandwidth: f64) -> Result<Self> {
        // Validates both values.
        estimate_capacity(noise_level, bandwidth)?;
        Ok(Self {
            noise_level,
            bandwidth,
        })
    }

    /// Capacity in bits per symbol.
    pub fn capacity(&self) -> Result<f64> {
        estimate_capacity(self.noise_level, self.bandwidth)
    }

    /// Quantization level count derived from capacity.
    pub fn levels(&self) -> Result<usize> {
        quantization_levels(self.capacity()?)
    }
}
