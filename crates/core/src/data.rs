//! Data structures for size-limit measurements

use std::collections::HashMap;

/// Loading and running time of an artifact, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Timing {
    /// Time to download the artifact
    pub loading: f64,
    /// Time to execute the artifact
    pub running: f64,
}

impl Timing {
    /// Total time, always derived from loading and running
    pub fn total(&self) -> f64 {
        self.loading + self.running
    }
}

/// One artifact's measurement at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    /// Artifact name (usually a file path)
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Timing data, present only when both loading and running were measured
    pub timing: Option<Timing>,
}

impl MeasurementRecord {
    /// Create a record without timing data
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            timing: None,
        }
    }

    /// Create a record with loading and running times
    pub fn with_timing(name: impl Into<String>, size: u64, loading: f64, running: f64) -> Self {
        Self {
            name: name.into(),
            size,
            timing: Some(Timing { loading, running }),
        }
    }

    /// Stand-in for an artifact missing from one of the snapshots
    pub fn empty() -> Self {
        Self::with_timing("-", 0, 0.0, 0.0)
    }

    pub fn loading(&self) -> f64 {
        self.timing.map_or(0.0, |t| t.loading)
    }

    pub fn running(&self) -> f64 {
        self.timing.map_or(0.0, |t| t.running)
    }

    pub fn total(&self) -> Option<f64> {
        self.timing.map(|t| t.total())
    }
}

/// A set of measurement records keyed by name
///
/// Names keep the order in which they were first seen. Built once through
/// [`FromIterator`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    records: Vec<MeasurementRecord>,
    index: HashMap<String, usize>,
}

impl Snapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    // A repeated name replaces the earlier record but keeps its position.
    fn insert(&mut self, record: MeasurementRecord) {
        match self.index.get(&record.name) {
            Some(&pos) => self.records[pos] = record,
            None => {
                self.index.insert(record.name.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Look up a record by name
    pub fn get(&self, name: &str) -> Option<&MeasurementRecord> {
        self.index.get(name).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Artifact names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeasurementRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<MeasurementRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = MeasurementRecord>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_sum_of_timings() {
        let record = MeasurementRecord::with_timing("a.js", 10, 2.1658984375, 0.10210999999999999);
        assert_eq!(record.total(), Some(2.1658984375 + 0.10210999999999999));
        assert_eq!(MeasurementRecord::new("a.js", 10).total(), None);
    }

    #[test]
    fn test_empty_record() {
        let empty = MeasurementRecord::empty();
        assert_eq!(empty.name, "-");
        assert_eq!(empty.size, 0);
        assert_eq!(empty.loading(), 0.0);
        assert_eq!(empty.running(), 0.0);
        assert_eq!(empty.total(), Some(0.0));
    }

    #[test]
    fn test_snapshot_last_write_wins() {
        let snapshot: Snapshot = vec![
            MeasurementRecord::new("a.js", 1),
            MeasurementRecord::new("b.js", 2),
            MeasurementRecord::new("a.js", 3),
        ]
        .into_iter()
        .collect();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("a.js").map(|r| r.size), Some(3));
        assert_eq!(snapshot.names().collect::<Vec<_>>(), vec!["a.js", "b.js"]);
    }

    #[test]
    fn test_snapshot_lookup_missing() {
        let snapshot = Snapshot::new();
        assert!(snapshot.is_empty());
        assert!(snapshot.get("nope").is_none());
        assert!(!snapshot.contains("nope"));
    }
}
