//! parbench library
//!
//! Benchmarks three task-execution strategies (OS thread pool, OS process
//! pool, single-threaded cooperative async) under CPU-bound and I/O-bound
//! synthetic workloads.

pub mod benchmark;
pub mod config;
pub mod metrics;
pub mod server;
pub mod strategy;
pub mod utils;
pub mod workload;
