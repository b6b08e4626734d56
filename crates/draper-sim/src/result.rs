//! Measurement counts and execution results.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Measurement counts: bitstring → observed frequency.
///
/// Bitstrings are MSB-first over classical bits — clbit `n−1` is the
/// leftmost character — so the key for an adder outcome reads as the
/// binary sum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    counts: FxHashMap<String, u32>,
}

impl Counts {
    /// Create an empty counts map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u32) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Get the count for a bitstring (zero if never observed).
    pub fn get(&self, bitstring: &str) -> u32 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of recorded shots.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    /// Observed probability of a bitstring.
    pub fn probability(&self, bitstring: &str) -> f64 {
        let total = self.total_shots();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.get(bitstring)) / total as f64
    }

    /// The most frequent outcome, if any.
    ///
    /// Ties break lexicographically so the result is deterministic.
    pub fn most_frequent(&self) -> Option<(&str, u32)> {
        self.counts
            .iter()
            .max_by(|(s1, c1), (s2, c2)| c1.cmp(c2).then_with(|| s2.cmp(s1)))
            .map(|(s, &c)| (s.as_str(), c))
    }

    /// Outcomes sorted by descending count (ties lexicographic).
    pub fn sorted(&self) -> Vec<(&String, &u32)> {
        let mut entries: Vec<_> = self.counts.iter().collect();
        entries.sort_by(|(s1, c1), (s2, c2)| c2.cmp(c1).then_with(|| s1.cmp(s2)));
        entries
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if no outcomes were recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over (bitstring, count) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u32)> {
        self.counts.iter()
    }

    /// Decode a bitstring key as an unsigned integer.
    ///
    /// Returns `None` for keys containing anything but '0'/'1'.
    pub fn as_value(bitstring: &str) -> Option<u64> {
        u64::from_str_radix(bitstring, 2).ok()
    }
}

/// Result of executing a circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measurement counts.
    pub counts: Counts,
    /// Number of shots executed.
    pub shots: u32,
    /// Execution time in milliseconds, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a new execution result.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
        }
    }

    /// Attach the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, millis: u64) -> Self {
        self.execution_time_ms = Some(millis);
        self
    }
}
