//! Benchmark orchestrator
//!
//! Drives one workload shape across all three execution strategies and
//! collects one ResultSet per strategy. The driver itself is sequential:
//! no two strategies' measurement windows ever overlap, and the echo
//! server outlives every I/O trial (created once, destroyed once).

use tracing::info;

use super::result_set::ResultSet;
use super::trial::TrialRunner;
use crate::config::{BenchConfig, BenchMode};
use crate::server::EchoServer;
use crate::strategy::ExecutionStrategy;
use crate::utils::Result;
use crate::workload::Workload;

pub struct Orchestrator {
    config: BenchConfig,
}

impl Orchestrator {
    pub fn new(config: BenchConfig) -> Self {
        Self { config }
    }

    /// Run the configured benchmark, one ResultSet per strategy
    pub fn run_all(&self) -> Result<Vec<ResultSet>> {
        match self.config.mode {
            BenchMode::Cpu { units } => {
                let workload = Workload::compute(units);
                self.run_workload(&workload)
            }
            BenchMode::Io {
                payload_size,
                timeout,
            } => {
                let server = EchoServer::start()?;
                let payload = generate_payload(payload_size, self.config.seed);
                let workload = Workload::echo(server.port(), payload, timeout);
                info!("Echo server on 127.0.0.1:{}", server.port());

                let outcome = self.run_workload(&workload);
                // Release the port before returning, on both paths.
                server.stop();
                outcome
            }
        }
    }

    fn strategies(&self) -> Vec<ExecutionStrategy> {
        vec![
            ExecutionStrategy::ThreadPool,
            ExecutionStrategy::ProcessPool {
                process_cap: self.config.process_cap,
                program: self.config.worker_program.clone(),
            },
            ExecutionStrategy::CooperativeAsync,
        ]
    }

    fn run_workload(&self, workload: &Workload) -> Result<Vec<ResultSet>> {
        let runner = TrialRunner::new(self.config.repeats, self.config.warmup, self.config.quiet);
        let mut results = Vec::new();
        for strategy in self.strategies() {
            info!(
                "Measuring {} x {} ({} tasks, concurrency {})",
                strategy.label(),
                workload.name(),
                self.config.tasks,
                self.config.concurrency
            );
            let set = runner.measure(strategy.label(), || {
                strategy.run(self.config.tasks, self.config.concurrency, workload)
            })?;
            results.push(set);
        }
        Ok(results)
    }
}

/// Deterministic payload for a fixed seed, random otherwise (seed 0)
fn generate_payload(size: usize, seed: u64) -> Vec<u8> {
    let mut rng = if seed == 0 {
        fastrand::Rng::new()
    } else {
        fastrand::Rng::with_seed(seed)
    };
    let mut payload = vec![0u8; size];
    rng.fill(&mut payload);
    payload
}
