//! Workload definitions
//!
//! A `Workload` is an immutable description of one unit of work. The same
//! instance is reused, unmutated, across every strategy and every trial so
//! that comparisons stay apples-to-apples.

pub mod compute;
pub mod echo;

use std::sync::Arc;
use std::time::Duration;

use crate::utils::WorkloadError;

pub use compute::compute_work;
pub use echo::{echo_roundtrip_async, echo_roundtrip_blocking};

/// One repeatable unit of synthetic work
#[derive(Debug, Clone)]
pub enum Workload {
    /// Pure CPU busy-loop, no side effects, no failure modes
    Compute { units: u64 },
    /// TCP round-trip against the loopback echo server
    Echo {
        port: u16,
        payload: Arc<Vec<u8>>,
        timeout: Duration,
    },
}

impl Workload {
    pub fn compute(units: u64) -> Self {
        Workload::Compute { units }
    }

    pub fn echo(port: u16, payload: Vec<u8>, timeout: Duration) -> Self {
        Workload::Echo {
            port,
            payload: Arc::new(payload),
            timeout,
        }
    }

    /// Short name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            Workload::Compute { .. } => "compute",
            Workload::Echo { .. } => "echo",
        }
    }

    /// Run one task to completion on the calling thread
    pub fn run_blocking(&self) -> Result<(), WorkloadError> {
        match self {
            Workload::Compute { units } => {
                compute_work(*units);
                Ok(())
            }
            Workload::Echo {
                port,
                payload,
                timeout,
            } => echo_roundtrip_blocking(*port, payload, *timeout),
        }
    }

    /// Run one task as a suspendable future
    ///
    /// The compute variant has no suspension point and runs to completion
    /// without yielding; only the echo variant suspends at network waits.
    pub async fn run_async(&self) -> Result<(), WorkloadError> {
        match self {
            Workload::Compute { units } => {
                compute_work(*units);
                Ok(())
            }
            Workload::Echo {
                port,
                payload,
                timeout,
            } => echo_roundtrip_async(*port, payload, *timeout).await,
        }
    }
}
