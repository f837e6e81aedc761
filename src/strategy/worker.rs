//! Process-pool worker protocol
//!
//! The process boundary carries only plain value-typed data: one JSON
//! `TaskSpec` line per task on the child's stdin, one JSON `TaskOutcome`
//! line per task on its stdout. Live resources never cross; the echo
//! connection is opened and closed inside the worker process.

use std::io::{BufRead, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::utils::{BenchError, Result};
use crate::workload::Workload;

/// Serializable description of one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskSpec {
    Compute {
        units: u64,
    },
    Echo {
        port: u16,
        payload: Vec<u8>,
        timeout_ms: u64,
    },
}

impl TaskSpec {
    /// Build the per-task descriptor for a workload
    pub fn from_workload(workload: &Workload) -> Self {
        match workload {
            Workload::Compute { units } => TaskSpec::Compute { units: *units },
            Workload::Echo {
                port,
                payload,
                timeout,
            } => TaskSpec::Echo {
                port: *port,
                payload: payload.as_ref().clone(),
                timeout_ms: timeout.as_millis() as u64,
            },
        }
    }

    /// Execute the task inside the worker process
    pub fn execute(&self) -> TaskOutcome {
        let result = match self {
            TaskSpec::Compute { units } => Workload::compute(*units).run_blocking(),
            TaskSpec::Echo {
                port,
                payload,
                timeout_ms,
            } => Workload::echo(
                *port,
                payload.clone(),
                Duration::from_millis(*timeout_ms),
            )
            .run_blocking(),
        };
        match result {
            Ok(()) => TaskOutcome::Ok,
            Err(e) => TaskOutcome::Failed {
                message: e.to_string(),
            },
        }
    }
}

/// Serializable result of one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskOutcome {
    Ok,
    Failed { message: String },
}

/// Child-side loop: read task lines until stdin closes
///
/// Each outcome line is flushed immediately so the parent can stream
/// results while later tasks are still queued.
pub fn run_worker<R: BufRead, W: Write>(input: R, mut output: W) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let spec: TaskSpec = serde_json::from_str(&line)
            .map_err(|e| BenchError::Worker(format!("Malformed task line: {e}")))?;
        let outcome = spec.execute();
        let encoded = serde_json::to_string(&outcome)
            .map_err(|e| BenchError::Worker(format!("Failed to encode outcome: {e}")))?;
        writeln!(output, "{encoded}")?;
        output.flush()?;
    }
    Ok(())
}

/// Entry point for `parbench worker` (hidden subcommand)
pub fn run_worker_stdio() -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_worker(stdin.lock(), stdout.lock())
}
