//! Per-agent channel statistics.
//!
//! Counts what happened to the messages an agent sent and received:
//! - Corruption injected by its outbound channel
//! - Parity verdicts on its inbound messages
//! - How parity failures were resolved (decoded or midpoint fallback)
//!
//! # Thread Safety
//!
//! Each agent owns its `ChannelStats` on its own thread. The simulation
//! collects them after the threads are joined, so no synchronization is
//! needed.

/// Message counters for one agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    // === Outbound ===
    /// Messages pushed onto the outbound channel
    pub messages_sent: u64,

    /// Outbound messages that had a bit flipped
    pub messages_corrupted: u64,

    // === Inbound ===
    /// Messages taken off the inbound channel
    pub messages_received: u64,

    /// Inbound messages whose parity checked out (neutral value used)
    pub parity_passes: u64,

    /// Inbound messages whose parity did not check out
    pub parity_failures: u64,

    /// Parity failures whose payload still matched a codeword
    pub decodes_recovered: u64,

    /// Parity failures whose payload matched nothing (midpoint used)
    pub decode_fallbacks: u64,
}

impl ChannelStats {
    /// Fraction of sent messages that were corrupted.
    pub fn corruption_rate(&self) -> f64 {
        ratio(self.messages_corrupted, self.messages_sent)
    }

    /// Fraction of received messages that failed parity.
    pub fn detection_rate(&self) -> f64 {
        ratio(self.parity_failures, self.messages_received)
    }

    /// Fraction of parity failures that still decoded to a symbol.
    pub fn recovery_rate(&self) -> f64 {
        ratio(self.decodes_recovered, self.parity_failures)
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self, agent: &str) {
        println!("=== {agent} ===");
        println!("Messages sent: {}", self.messages_sent);
        println!(
            "Corrupted in transit: {} ({:.2}%)",
            self.messages_corrupted,
            self.corruption_rate() * 100.0
        );
        println!("Messages received: {}", self.messages_received);
        println!("Parity passed (neutral value): {}", self.parity_passes);
        println!(
            "Parity failed: {} ({:.2}%)",
            self.parity_failures,
            self.detection_rate() * 100.0
        );
        println!(
            "  decoded anyway: {} ({:.2}%)",
            self.decodes_recovered,
            self.recovery_rate() * 100.0
        );
        println!("  midpoint fallback: {}", self.decode_fallbacks);
        println!();
    }

    /// Export counters as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "messages_sent={}\n\
             messages_corrupted={}\n\
             corruption_rate={:.4}\n\
             messages_received={}\n\
             parity_passes={}\n\
             parity_failures={}\n\
             detection_rate={:.4}\n\
             decodes_recovered={}\n\
             recovery_rate={:.4}\n\
             decode_fallbacks={}\n",
            self.messages_sent,
            self.messages_corrupted,
            self.corruption_rate(),
            self.messages_received,
            self.parity_passes,
            self.parity_failures,
            self.detection_rate(),
            self.decodes_recovered,
            self.recovery_rate(),
            self.decode_fallbacks,
        )
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_empty() {
        let stats = ChannelStats::default();
        assert_eq!(stats.corruption_rate(), 0.0);
        assert_eq!(stats.detection_rate(), 0.0);
        assert_eq!(stats.recovery_rate(), 0.0);
    }

    #[test]
    fn test_rates() {
        let stats = ChannelStats {
            messages_sent: 100,
            messages_corrupted: 10,
            messages_received: 100,
            parity_passes: 92,
            parity_failures: 8,
            decodes_recovered: 6,
            decode_fallbacks: 2,
        };
        assert_eq!(stats.corruption_rate(), 0.1);
        assert_eq!(stats.detection_rate(), 0.08);
        assert_eq!(stats.recovery_rate(), 0.75);
    }

    #[test]
    fn test_export_text() {
        let stats = ChannelStats {
            messages_sent: 100,
            messages_received: 100,
            parity_passes: 100,
            ..Default::default()
        };
        let text = stats.export_text();
        assert!(text.contains("messages_sent=100"));
        assert!(text.contains("parity_passes=100"));
        assert!(text.contains("detection_rate=0.0000"));
        assert!(text.contains("recovery_rate=0.0000"));
    }
}
