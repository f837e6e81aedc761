//! Process-pool execution strategy
//!
//! Spawns the harness binary itself in hidden worker mode, one child per
//! pool slot, capped at `min(concurrency, process_cap)`. Tasks are
//! partitioned statically across children; per child, a writer thread
//! feeds task lines into stdin while the driver thread reads outcome
//! lines from stdout, so neither pipe can fill up and stall the other.
//!
//! Every child is waited on before this call returns, on success and on
//! failure, so no pool state leaks into the next trial.

use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use tracing::debug;

use super::worker::{TaskOutcome, TaskSpec};
use crate::utils::{BenchError, Result};
use crate::workload::Workload;

/// Split `task_count` tasks across `workers` children as evenly as possible
fn partition(task_count: u32, workers: u32) -> Vec<u32> {
    let base = task_count / workers;
    let extra = task_count % workers;
    (0..workers)
        .map(|w| base + u32::from(w < extra))
        .collect()
}

fn spawn_worker(program: &Path) -> Result<Child> {
    Command::new(program)
        .arg("worker")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| BenchError::Worker(format!("Failed to spawn worker process: {e}")))
}

/// Drive one child: feed its task lines and collect its outcomes
fn drive_worker(mut child: Child, spec_line: &str, tasks: u32) -> Result<()> {
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| BenchError::Worker("Worker stdin unavailable".to_string()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| BenchError::Worker("Worker stdout unavailable".to_string()))?;

    std::thread::scope(|scope| {
        let writer = scope.spawn(move || -> io::Result<()> {
            for _ in 0..tasks {
                writeln!(stdin, "{spec_line}")?;
            }
            // stdin drops here, closing the pipe so the child's read
            // loop terminates.
            Ok(())
        });

        let mut first_failure: Option<String> = None;
        let mut outcomes = 0u32;
        for line in BufReader::new(stdout).lines() {
            let line = line?;
            let outcome: TaskOutcome = serde_json::from_str(&line)
                .map_err(|e| BenchError::Worker(format!("Malformed worker outcome: {e}")))?;
            outcomes += 1;
            if let TaskOutcome::Failed { message } = outcome {
                if first_failure.is_none() {
                    first_failure = Some(message);
                }
            }
        }

        let status = child
            .wait()
            .map_err(|e| BenchError::Worker(format!("Failed to wait for worker: {e}")))?;

        writer
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("Writer thread panicked")))?;
        if !status.success() {
            return Err(BenchError::Worker(format!("Worker exited with {status}")));
        }
        if outcomes != tasks {
            return Err(BenchError::Worker(format!(
                "Worker returned {outcomes} outcomes for {tasks} tasks"
            )));
        }
        match first_failure {
            Some(message) => Err(BenchError::Worker(message)),
            None => Ok(()),
        }
    })
}

pub fn run(
    task_count: u32,
    concurrency: u32,
    process_cap: u32,
    program: &Path,
    workload: &Workload,
) -> Result<()> {
    let workers = concurrency.min(process_cap).min(task_count);
    let shares = partition(task_count, workers);
    debug!(
        "Process pool: {} workers for {} tasks (cap {})",
        workers, task_count, process_cap
    );

    let spec_line = serde_json::to_string(&TaskSpec::from_workload(workload))
        .map_err(|e| BenchError::Worker(format!("Failed to encode task: {e}")))?;

    // Spawn the whole pool first so children run concurrently, then drive
    // each from its own thread.
    let mut children = Vec::with_capacity(workers as usize);
    for _ in 0..workers {
        match spawn_worker(program) {
            Ok(child) => children.push(child),
            Err(e) => {
                // Tear down the partial pool before propagating.
                for mut child in children {
                    child.kill().ok();
                    child.wait().ok();
                }
                return Err(e);
            }
        }
    }

    let mut first_error: Option<BenchError> = None;
    std::thread::scope(|scope| {
        let handles: Vec<_> = children
            .into_iter()
            .zip(shares.iter())
            .map(|(child, &tasks)| {
                let spec_line = spec_line.as_str();
                scope.spawn(move || drive_worker(child, spec_line, tasks))
            })
            .collect();
        for handle in handles {
            let joined = handle
                .join()
                .unwrap_or_else(|_| Err(BenchError::Worker("Driver thread panicked".to_string())));
            if let Err(e) = joined {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    });

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
