//! Error types for parbench

use std::io;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Setup error: {0}")]
    Setup(String),

    #[error("Workload error: {0}")]
    Workload(#[from] WorkloadError),

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Failures a single workload task can report
///
/// Echo mismatch and early close are distinct on purpose: a mismatch means
/// the server echoed the wrong bytes, an early close means it hung up before
/// echoing enough of them. Neither may be silently swallowed.
#[derive(Error, Debug)]
pub enum WorkloadError {
    #[error("Echo mismatch: {payload_len} bytes sent, first difference at offset {first_diff}")]
    EchoMismatch {
        payload_len: usize,
        first_diff: usize,
    },

    #[error("Connection closed early: received {received} of {expected} bytes")]
    ConnectionClosedEarly { received: usize, expected: usize },

    #[error("Connect timeout after {0}ms")]
    ConnectTimeout(u64),

    #[error("IO timeout after {0}ms")]
    IoTimeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
