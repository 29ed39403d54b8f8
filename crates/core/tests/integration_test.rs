//! Integration tests for the full agent experiment.
//!
//! These tests verify end-to-end behavior: capacity -> code table ->
//! quantize -> encode -> parity -> noise -> queue -> parity check ->
//! decode-or-fallback -> adapt, across two concurrently running agents.

use infochannel_core::{
    bits::BitString,
    capacity::{estimate_capacity, quantization_levels, ChannelParameters},
    channel::NoisyChannel,
    huffman::Codebook,
    run_experiment, trace, Error, ExperimentConfig,
};

/// The reference run: noise 0.1, adapt rate 0.1, 100 steps, bandwidth 1.
#[test]
fn test_reference_experiment() {
    let capacity = estimate_capacity(0.1, 1.0).unwrap();
    assert!((capacity - 3.459).abs() < 1e-3);
    assert_eq!(quantization_levels(capacity).unwrap(), 11);

    let config = ExperimentConfig::new(100, 0.1, 0.1).with_seed(42);
    let outcome = run_experiment(&config).expect("experiment failed");

    assert_eq!(outcome.levels, 11);
    assert!((outcome.capacity - capacity).abs() < 1e-12);

    let (first, second) = outcome.logs();
    for (log, name) in [(first, "Agent1"), (second, "Agent2")] {
        assert_eq!(log.len(), 100);

        let steps: Vec<usize> = log.entries().iter().map(|e| e.step).collect();
        let expected: Vec<usize> = (0..100).collect();
        assert_eq!(steps, expected);

        for entry in log.entries() {
            assert_eq!(entry.agent, name);
            assert!((0.0..=1.0).contains(&entry.value), "{entry:?}");
        }
    }
}

/// Every message an agent sends is received by the other one.
#[test]
fn test_message_accounting() {
    let config = ExperimentConfig::new(200, 0.3, 0.1).with_seed(9);
    let outcome = run_experiment(&config).unwrap();
    let [first, second] = &outcome.agents;

    assert_eq!(first.stats.messages_sent, 200);
    assert_eq!(second.stats.messages_received, 200);
    assert_eq!(second.stats.messages_sent, 200);
    assert_eq!(first.stats.messages_received, 200);

    // At most one flip per message, so parity catches every corruption
    assert_eq!(first.stats.messages_corrupted, second.stats.parity_failures);
    assert_eq!(second.stats.messages_corrupted, first.stats.parity_failures);

    for report in [first, second] {
        let s = report.stats;
        assert_eq!(s.parity_passes + s.parity_failures, s.messages_received);
        assert_eq!(s.decodes_recovered + s.decode_fallbacks, s.parity_failures);
    }
}

/// With adapt rate 1 and very low noise, both agents snap to the neutral
/// value on nearly every step and so agree with each other.
#[test]
fn test_symmetric_convergence() {
    let config = ExperimentConfig::new(200, 0.001, 1.0).with_seed(5);
    let outcome = run_experiment(&config).unwrap();
    let (first, second) = outcome.logs();

    let agreeing = first
        .values()
        .zip(second.values())
        .filter(|(a, b)| *a == 0.5 && *b == 0.5)
        .count();
    assert!(agreeing >= 180, "only {agreeing} of 200 steps agreed");
}

/// Capacity below one bit: a single level, placeholder codeword, no crash.
#[test]
fn test_single_level_experiment() {
    let params = ChannelParameters::new(1.0, 0.5).unwrap();
    assert_eq!(params.levels().unwrap(), 1);

    let book = Codebook::uniform(1).unwrap();
    let code = book.encode(0).unwrap();
    assert_eq!(code.to_string(), "0");
    assert_eq!(book.decode(code).unwrap(), 0);

    let config = ExperimentConfig::new(30, 1.0, 0.5)
        .with_bandwidth(0.5)
        .with_seed(3);
    let outcome = run_experiment(&config).unwrap();
    assert_eq!(outcome.levels, 1);

    let (first, second) = outcome.logs();
    assert_eq!(first.len(), 30);
    assert!(first.values().chain(second.values()).all(|v| v == 0.5));
}

/// Full noise with bandwidth 1 is exactly one bit of capacity: two levels.
#[test]
fn test_full_noise_experiment() {
    let config = ExperimentConfig::new(50, 1.0, 0.2).with_seed(11);
    let outcome = run_experiment(&config).unwrap();
    assert_eq!(outcome.levels, 2);

    for report in &outcome.agents {
        // Every message was corrupted and flagged
        assert_eq!(report.stats.messages_corrupted, 50);
        assert_eq!(report.stats.parity_failures, 50);
        assert!(report.log.values().all(|v| (0.0..=1.0).contains(&v)));
    }
}

/// A nearly clean channel needs a code table with ~100 000 symbols.
#[test]
fn test_low_noise_experiment() {
    let config = ExperimentConfig::new(5, 1e-5, 0.1).with_seed(3);
    let outcome = run_experiment(&config).unwrap();
    assert!(outcome.levels >= 100_000, "levels = {}", outcome.levels);

    for report in &outcome.agents {
        assert_eq!(report.log.len(), 5);
        assert_eq!(report.stats.messages_received, 5);
        assert!(report.log.values().all(|v| (0.0..=1.0).contains(&v)));
    }
}

/// Invalid parameters are reported before any thread starts.
#[test]
fn test_invalid_parameters() {
    let err = run_experiment(&ExperimentConfig::new(10, 0.0, 0.1)).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));

    let err = run_experiment(&ExperimentConfig::new(0, 0.1, 0.1)).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
}

/// One codeword through a perfect channel and back.
#[test]
fn test_codeword_over_channel() {
    let book = Codebook::uniform(11).unwrap();
    let mut channel = NoisyChannel::new(0.0, 1).unwrap();

    for symbol in 0..11 {
        let sent = channel.transmit(book.encode(symbol).unwrap()).unwrap();
        let reception = NoisyChannel::receive(&sent.message);
        assert!(reception.parity_ok);
        assert_eq!(book.decode(&reception.payload).unwrap(), symbol);
    }

    let garbage: BitString = "11".parse().unwrap();
    assert!(book.decode(&garbage).is_err());
}

/// Logs exported to CSV keep one row per entry.
#[test]
fn test_trace_export() {
    let config = ExperimentConfig::new(15, 0.2, 0.1).with_seed(8);
    let outcome = run_experiment(&config).unwrap();
    let (first, second) = outcome.logs();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("behavior.csv");
    trace::write_csv(&path, &[first, second]).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    assert_eq!(reader.records().count(), 30);
}
