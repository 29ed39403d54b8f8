//! Behavior traces produced by agents.
//!
//! Each agent appends one [`BehaviorLogEntry`] per completed step. Once an
//! experiment finishes the logs are handed back read-only; plotting and
//! statistics live outside this crate and consume them as-is or through the
//! CSV export below.
//!
//! # CSV layout
//!
//! ```text
//! step,value,agent
//! 0,0.5,Agent1
//! ...
//! ```

use crate::error::Result;
use std::io::Write;
use std::path::Path;

/// One completed agent step.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorLogEntry {
    /// Zero-based step index
    pub step: usize,

    /// Behavior after adapting at this step, in [0, 1]
    pub value: f64,

    /// Name of the agent that produced the entry
    pub agent: String,
}

/// Append-only behavior trace for a single agent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BehaviorLog {
    agent: String,
    entries: Vec<BehaviorLogEntry>,
}

impl BehaviorLog {
    /// Create an empty log for `agent`.
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            entries: Vec::new(),
        }
    }

    /// Record the behavior value reached at `step`.
    pub fn record(&mut self, step: usize, value: f64) {
        self.entries.push(BehaviorLogEntry {
            step,
            value,
            agent: self.agent.clone(),
        });
    }

    /// Owning agent's name.
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// All entries in step order.
    pub fn entries(&self) -> &[BehaviorLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Behavior values in step order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.value)
    }

    /// Most recent behavior value, if any step completed.
    pub fn last_value(&self) -> Option<f64> {
        self.entries.last().map(|e| e.value)
    }
}

impl IntoIterator for BehaviorLog {
    type Item = BehaviorLogEntry;
    type IntoIter = std::vec::IntoIter<BehaviorLogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Write `logs` as `step,value,agent` rows to any writer.
pub fn write_csv_to<W: Write>(out: W, logs: &[&BehaviorLog]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["step", "value", "agent"])?;

    for log in logs {
        for entry in log.entries() {
            writer.write_record(&[
                entry.step.to_string(),
                entry.value.to_string(),
                entry.agent.clone(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Create (or truncate) the file at `path` and write `logs` to it.
pub fn write_csv(path: &Path, logs: &[&BehaviorLog]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv_to(file, logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log(agent: &str, values: &[f64]) -> BehaviorLog {
        let mut log = BehaviorLog::new(agent);
        for (step, &value) in values.iter().enumerate() {
            log.record(step, value);
        }
        log
    }

    #[test]
    fn test_record_appends_in_order() {
        let log = sample_log("Agent1", &[0.5, 0.45, 0.4]);
        assert_eq!(log.len(), 3);
        assert_eq!(log.agent(), "Agent1");
        assert_eq!(log.last_value(), Some(0.4));

        let steps: Vec<usize> = log.entries().iter().map(|e| e.step).collect();
        assert_eq!(steps, vec![0, 1, 2]);
        assert!(log.entries().iter().all(|e| e.agent == "Agent1"));
    }

    #[test]
    fn test_empty_log() {
        let log = BehaviorLog::new("Agent2");
        assert!(log.is_empty());
        assert_eq!(log.last_value(), None);
    }

    #[test]
    fn test_csv_layout() {
        let a = sample_log("Agent1", &[0.5, 0.25]);
        let b = sample_log("Agent2", &[0.75]);

        let mut buf = Vec::new();
        write_csv_to(&mut buf, &[&a, &b]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "step,value,agent\n0,0.5,Agent1\n1,0.25,Agent1\n0,0.75,Agent2\n"
        );
    }

    #[test]
    fn test_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.csv");
        let log = sample_log("Agent1", &[0.5]);

        write_csv(&path, &[&log]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][2], "Agent1");
        assert_eq!(rows[0][1].parse::<f64>().unwrap(), 0.5);
    }
}
