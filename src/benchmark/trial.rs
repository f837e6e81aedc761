//! Trial runner
//!
//! Executes one strategy/workload invocation repeatedly: an unmeasured
//! warmup phase, then exactly `repeats` measured trials timed with a
//! monotonic clock. Trials are strictly sequential; trial k+1 never starts
//! before trial k's invocation, including its pool teardown, has returned.

use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

use super::result_set::ResultSet;
use crate::utils::Result;

/// Repeat/warmup configuration shared by every measurement
#[derive(Debug, Clone, Copy)]
pub struct TrialRunner {
    pub repeats: u32,
    pub warmup: u32,
    pub quiet: bool,
}

impl TrialRunner {
    pub fn new(repeats: u32, warmup: u32, quiet: bool) -> Self {
        Self {
            repeats,
            warmup,
            quiet,
        }
    }

    /// Measure `invocation` and return one ResultSet
    ///
    /// Any failure, warmup or measured, propagates immediately: a benchmark
    /// run is all-or-nothing per strategy and no partial ResultSet escapes.
    pub fn measure<F>(&self, label: &str, mut invocation: F) -> Result<ResultSet>
    where
        F: FnMut() -> Result<()>,
    {
        for _ in 0..self.warmup {
            invocation()?;
        }

        let progress = self.progress_bar(label);
        let mut durations = Vec::with_capacity(self.repeats as usize);
        for _ in 0..self.repeats {
            let start = Instant::now();
            invocation()?;
            durations.push(start.elapsed());
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        }
        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(ResultSet::new(label, durations))
    }

    fn progress_bar(&self, label: &str) -> Option<ProgressBar> {
        if self.quiet {
            return None;
        }
        let pb = ProgressBar::new(u64::from(self.repeats));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg:<12} [{bar:30.cyan/blue}] {pos}/{len} trials")
                .expect("valid progress template")
                .progress_chars("#>-"),
        );
        pb.set_message(label.to_string());
        Some(pb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::BenchError;

    #[test]
    fn test_records_exactly_repeats() {
        let runner = TrialRunner::new(5, 2, true);
        let mut calls = 0u32;
        let set = runner
            .measure("threads", || {
                calls += 1;
                Ok(())
            })
            .expect("measure");

        // warmup invocations run but are not recorded
        assert_eq!(calls, 7);
        assert_eq!(set.runs(), 5);
        assert_eq!(set.label, "threads");
    }

    #[test]
    fn test_measured_failure_aborts() {
        let runner = TrialRunner::new(5, 0, true);
        let mut calls = 0u32;
        let result = runner.measure("threads", || {
            calls += 1;
            if calls == 3 {
                Err(BenchError::Worker("injected".to_string()))
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
        // No invocations after the failure
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_warmup_failure_aborts() {
        let runner = TrialRunner::new(5, 1, true);
        let result = runner.measure("threads", || {
            Err(BenchError::Worker("injected".to_string()))
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_warmup() {
        let runner = TrialRunner::new(1, 0, true);
        let mut calls = 0u32;
        runner
            .measure("async", || {
                calls += 1;
                Ok(())
            })
            .expect("measure");
        assert_eq!(calls, 1);
    }
}
