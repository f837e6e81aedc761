//! Utility modules

pub mod error;

pub use error::{BenchError, Result, WorkloadError};
