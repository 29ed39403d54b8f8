//! infochannel-core: two agents adapting over a coded noisy channel
//!
//! This library provides the core components for a simulation in which:
//! - Channel capacity fixes how many quantization levels an agent can use
//! - Behavior values are quantized and Huffman coded
//! - A parity bit is appended and the channel may flip one bit
//! - Receivers check parity, decode or fall back, and adapt their behavior
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `capacity`: Shannon capacity and quantization level count
//! - `bits`: Owned bit strings
//! - `huffman`: Deterministic Huffman code tables
//! - `channel`: Parity and bit-flip noise with seeded randomness
//! - `agent`: Send / receive / adapt step cycle
//! - `simulation`: Two agents on two threads, wired by queues
//! - `trace`: Behavior logs and CSV export
//! - `metrics`: Per-agent channel counters
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **No shared state**: Agents own everything; queues are the only link
//! - **Deterministic**: Seeded randomness makes runs reproducible
//! - **Observable**: Structured `tracing` events plus per-agent counters
//!
//! # Example
//! ```
//! use infochannel_core::{run_experiment, ExperimentConfig};
//!
//! let config = ExperimentConfig::new(20, 0.1, 0.1).with_seed(7);
//! let outcome = run_experiment(&config).unwrap();
//! let (first, second) = outcome.logs();
//! assert_eq!(first.len(), 20);
//! assert_eq!(second.len(), 20);
//! ```

pub mod agent;
pub mod bits;
pub mod capacity;
pub mod channel;
pub mod error;
pub mod huffman;
pub mod metrics;
pub mod simulation;
pub mod trace;

// Re-export commonly used types
pub use error::{Error, Result};
pub use simulation::{run_experiment, ExperimentConfig, ExperimentOutcome};
pub use trace::{BehaviorLog, BehaviorLogEntry};
