//! Thread-pool execution strategy
//!
//! A fixed set of OS threads claims task indices from a shared atomic
//! counter; the counter is the only synchronization point on the hot path.
//! All tasks are drained even after a failure, then the first recorded
//! failure is surfaced, matching the other strategies' join semantics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::utils::{BenchError, Result};
use crate::workload::Workload;

pub fn run(task_count: u32, concurrency: u32, workload: &Workload) -> Result<()> {
    let workers = concurrency.min(task_count);
    let next_task = AtomicU64::new(0);
    let first_error: Mutex<Option<BenchError>> = Mutex::new(None);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let index = next_task.fetch_add(1, Ordering::Relaxed);
                if index >= u64::from(task_count) {
                    break;
                }
                if let Err(e) = workload.run_blocking() {
                    let mut slot = first_error.lock().expect("error slot poisoned");
                    if slot.is_none() {
                        *slot = Some(e.into());
                    }
                }
            });
        }
    });

    match first_error.into_inner().expect("error slot poisoned") {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::EchoServer;
    use std::time::Duration;

    #[test]
    fn test_compute_batch() {
        let workload = Workload::compute(1000);
        run(20, 4, &workload).expect("compute batch");
    }

    #[test]
    fn test_concurrency_above_task_count() {
        let workload = Workload::compute(10);
        run(2, 64, &workload).expect("small batch");
    }

    #[test]
    fn test_echo_batch() {
        let server = EchoServer::start().expect("server");
        let workload = Workload::echo(server.port(), vec![3u8; 128], Duration::from_secs(5));
        run(16, 4, &workload).expect("echo batch");
        server.stop();
    }

    #[test]
    fn test_failure_fails_whole_invocation() {
        // Nothing listens on this port; every task fails and the
        // invocation must report it rather than claim partial success.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let workload = Workload::echo(port, vec![1u8; 8], Duration::from_millis(500));
        assert!(run(4, 2, &workload).is_err());
    }
}
