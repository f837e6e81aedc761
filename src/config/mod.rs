//! Configuration: CLI arguments and resolved runtime config

pub mod bench_config;
pub mod cli;

pub use bench_config::{BenchConfig, BenchMode};
pub use cli::{BenchCommand, CliArgs, CommonArgs, CpuArgs, IoArgs};
