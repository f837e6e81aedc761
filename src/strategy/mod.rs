//! Execution strategies
//!
//! One polymorphic surface over three concurrency models: OS thread pool,
//! OS process pool, and single-threaded cooperative scheduling. A strategy
//! owns no state across invocations; any pool it creates is scoped to one
//! `run` call and fully torn down before it returns.

pub mod cooperative;
pub mod process_pool;
pub mod thread_pool;
pub mod worker;

use std::path::PathBuf;

use crate::utils::{BenchError, Result};
use crate::workload::Workload;

pub use worker::{run_worker_stdio, TaskOutcome, TaskSpec};

/// One of the three concurrency models under comparison
#[derive(Debug, Clone)]
pub enum ExecutionStrategy {
    /// Fixed pool of OS threads sharing one address space
    ThreadPool,
    /// Fixed pool of worker processes; tasks cross the boundary as
    /// serialized descriptors
    ProcessPool {
        /// Ceiling on pool width regardless of requested concurrency
        process_cap: u32,
        /// Binary to respawn in worker mode
        program: PathBuf,
    },
    /// Single-threaded cooperative scheduling behind a counting
    /// admission gate
    CooperativeAsync,
}

impl ExecutionStrategy {
    /// Row label in the comparison table
    pub fn label(&self) -> &'static str {
        match self {
            ExecutionStrategy::ThreadPool => "threads",
            ExecutionStrategy::ProcessPool { .. } => "processes",
            ExecutionStrategy::CooperativeAsync => "async",
        }
    }

    /// Run `task_count` instances of the workload at concurrency ceiling
    /// `concurrency`, returning once all tasks completed or with the first
    /// failure after all tasks drained.
    pub fn run(&self, task_count: u32, concurrency: u32, workload: &Workload) -> Result<()> {
        if task_count == 0 {
            return Err(BenchError::Config("task count must be positive".to_string()));
        }
        if concurrency == 0 {
            return Err(BenchError::Config("concurrency must be positive".to_string()));
        }
        match self {
            ExecutionStrategy::ThreadPool => thread_pool::run(task_count, concurrency, workload),
            ExecutionStrategy::ProcessPool {
                process_cap,
                program,
            } => process_pool::run(task_count, concurrency, *process_cap, program, workload),
            ExecutionStrategy::CooperativeAsync => {
                cooperative::run(task_count, concurrency, workload)
            }
        }
    }
}
