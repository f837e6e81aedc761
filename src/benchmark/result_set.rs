//! Recorded trial durations for one (strategy, workload) pair

use std::time::Duration;

/// Ordered trial durations plus derived summary statistics
///
/// Durations are stored in recording order (trial 1..repeats); warmup
/// trials are never recorded here.
#[derive(Debug, Clone)]
pub struct ResultSet {
    pub label: String,
    pub durations: Vec<Duration>,
}

impl ResultSet {
    pub fn new(label: impl Into<String>, durations: Vec<Duration>) -> Self {
        Self {
            label: label.into(),
            durations,
        }
    }

    /// Number of measured trials
    pub fn runs(&self) -> usize {
        self.durations.len()
    }

    /// Conventional statistical median: the middle duration for an odd
    /// count, the mean of the two middle durations for an even count.
    pub fn median(&self) -> Duration {
        if self.durations.is_empty() {
            return Duration::ZERO;
        }
        let mut sorted = self.durations.clone();
        sorted.sort_unstable();
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 1 {
            sorted[mid]
        } else {
            (sorted[mid - 1] + sorted[mid]) / 2
        }
    }

    pub fn min(&self) -> Duration {
        self.durations.iter().min().copied().unwrap_or(Duration::ZERO)
    }

    pub fn max(&self) -> Duration {
        self.durations.iter().max().copied().unwrap_or(Duration::ZERO)
    }
}
