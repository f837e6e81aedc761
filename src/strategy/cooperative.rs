//! Cooperative async execution strategy
//!
//! All tasks run on one OS thread under a current-thread tokio runtime.
//! A counting semaphore is the admission gate: at most `concurrency`
//! tasks are past admission at once, the rest suspend until a slot frees.
//! Every task is joined before the first failure is surfaced, matching
//! the other strategies' all-or-nothing join semantics.

use std::sync::Arc;

use futures::future::join_all;
use tokio::runtime::Builder;
use tokio::sync::Semaphore;

use crate::utils::{BenchError, Result};
use crate::workload::Workload;

pub fn run(task_count: u32, concurrency: u32, workload: &Workload) -> Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| BenchError::Setup(format!("Failed to build runtime: {e}")))?;

    runtime.block_on(async {
        let gate = Arc::new(Semaphore::new(concurrency as usize));
        let mut handles = Vec::with_capacity(task_count as usize);
        for _ in 0..task_count {
            let gate = Arc::clone(&gate);
            let workload = workload.clone();
            handles.push(tokio::spawn(async move {
                // The semaphore is never closed, so acquire only fails on
                // a harness bug.
                let _permit = gate.acquire_owned().await.expect("admission gate closed");
                workload.run_async().await
            }));
        }

        let mut first_error: Option<BenchError> = None;
        for joined in join_all(handles).await {
            let result = match joined {
                Ok(result) => result.map_err(BenchError::from),
                Err(e) => Err(BenchError::Worker(format!("Task panicked: {e}"))),
            };
            if let Err(e) = result {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::EchoServer;
    use std::time::Duration;

    #[test]
    fn test_compute_batch() {
        let workload = Workload::compute(1000);
        run(20, 2, &workload).expect("compute batch");
    }

    #[test]
    fn test_echo_batch() {
        let server = EchoServer::start().expect("server");
        let workload = Workload::echo(server.port(), vec![5u8; 256], Duration::from_secs(5));
        run(50, 10, &workload).expect("echo batch");
        server.stop();
    }

    #[test]
    fn test_gate_narrower_than_tasks() {
        let server = EchoServer::start().expect("server");
        let workload = Workload::echo(server.port(), vec![5u8; 64], Duration::from_secs(5));
        // One slot: tasks admit strictly one at a time and all complete.
        run(8, 1, &workload).expect("serialized batch");
        server.stop();
    }

    #[test]
    fn test_failure_fails_whole_invocation() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let workload = Workload::echo(port, vec![1u8; 8], Duration::from_millis(500));
        assert!(run(4, 2, &workload).is_err());
    }
}
