//! Command-line argument parsing
//!
//! One subcommand per workload shape, mirroring the tool's two benchmark
//! modes. Defaults differ per shape (the I/O benchmark wants many cheap
//! tasks, the CPU benchmark few expensive ones), so each subcommand
//! carries its own argument set.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Compare thread-pool, process-pool, and cooperative-async execution on
/// CPU-bound and I/O-bound workloads
#[derive(Parser, Debug, Clone)]
#[command(name = "parbench")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: BenchCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum BenchCommand {
    /// CPU-bound benchmark (pure computation)
    Cpu(CpuArgs),

    /// I/O-bound benchmark (loopback TCP echo round-trips)
    Io(IoArgs),

    /// Internal: run as a process-pool worker speaking the task protocol
    /// on stdin/stdout
    #[command(hide = true)]
    Worker,
}

/// Arguments shared by both benchmark shapes
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Concurrency ceiling: pool width and admission-gate size
    /// (0 = number of host cores)
    #[arg(short = 'c', long = "concurrency", default_value_t = 0)]
    pub concurrency: u32,

    /// Warmup runs (not measured)
    #[arg(long = "warmup", default_value_t = 1)]
    pub warmup: u32,

    /// Ceiling on process-pool width regardless of requested concurrency
    #[arg(long = "process-cap", default_value_t = 64)]
    pub process_cap: u32,

    /// Seed for payload generation (0 = random seed)
    #[arg(long = "seed", default_value_t = 0)]
    pub seed: u64,

    /// Write results as JSON to this path
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Quiet mode (errors only, no progress bars)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CpuArgs {
    /// Number of tasks to run per trial
    #[arg(short = 'n', long = "tasks", default_value_t = 20)]
    pub tasks: u32,

    /// Number of measured trials
    #[arg(short = 'r', long = "repeats", default_value_t = 5)]
    pub repeats: u32,

    /// Work units per task (increase for longer runs)
    #[arg(long = "cpu-units", default_value_t = 200_000)]
    pub cpu_units: u64,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
pub struct IoArgs {
    /// Number of tasks to run per trial
    #[arg(short = 'n', long = "tasks", default_value_t = 200)]
    pub tasks: u32,

    /// Number of measured trials
    #[arg(short = 'r', long = "repeats", default_value_t = 10)]
    pub repeats: u32,

    /// Bytes per echo request
    #[arg(long = "payload-size", default_value_t = 256)]
    pub payload_size: usize,

    /// Per-connection connect/read timeout in milliseconds
    #[arg(long = "io-timeout-ms", default_value_t = 20_000)]
    pub io_timeout_ms: u64,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl CommonArgs {
    /// Validate shared argument combinations
    pub fn validate(&self, tasks: u32, repeats: u32) -> Result<(), String> {
        if tasks == 0 {
            return Err("--tasks must be at least 1".to_string());
        }
        if repeats == 0 {
            return Err("--repeats must be at least 1".to_string());
        }
        if self.process_cap == 0 {
            return Err("--process-cap must be at least 1".to_string());
        }
        if self.quiet && self.verbose {
            return Err("--quiet and --verbose are mutually exclusive".to_string());
        }
        Ok(())
    }

    /// Effective concurrency (0 = auto-detect from host cores)
    pub fn effective_concurrency(&self) -> u32 {
        if self.concurrency == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get() as u32)
                .unwrap_or(4)
        } else {
            self.concurrency
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(args)
    }

    #[test]
    fn test_cpu_defaults() {
        let args = parse(&["parbench", "cpu"]);
        match args.command {
            BenchCommand::Cpu(cpu) => {
                assert_eq!(cpu.tasks, 20);
                assert_eq!(cpu.repeats, 5);
                assert_eq!(cpu.cpu_units, 200_000);
                assert_eq!(cpu.common.warmup, 1);
                assert_eq!(cpu.common.process_cap, 64);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_io_defaults() {
        let args = parse(&["parbench", "io"]);
        match args.command {
            BenchCommand::Io(io) => {
                assert_eq!(io.tasks, 200);
                assert_eq!(io.repeats, 10);
                assert_eq!(io.payload_size, 256);
                assert_eq!(io.io_timeout_ms, 20_000);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_io_flags() {
        let args = parse(&[
            "parbench",
            "io",
            "--tasks",
            "50",
            "-c",
            "8",
            "--payload-size",
            "1024",
            "-q",
        ]);
        match args.command {
            BenchCommand::Io(io) => {
                assert_eq!(io.tasks, 50);
                assert_eq!(io.common.concurrency, 8);
                assert_eq!(io.payload_size, 1024);
                assert!(io.common.quiet);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_validation_zero_tasks() {
        let args = parse(&["parbench", "cpu", "--tasks", "0"]);
        match args.command {
            BenchCommand::Cpu(cpu) => {
                assert!(cpu.common.validate(cpu.tasks, cpu.repeats).is_err());
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_effective_concurrency_auto() {
        let args = parse(&["parbench", "cpu"]);
        match args.command {
            BenchCommand::Cpu(cpu) => {
                assert!(cpu.common.effective_concurrency() >= 1);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_worker_subcommand_parses() {
        let args = parse(&["parbench", "worker"]);
        assert!(matches!(args.command, BenchCommand::Worker));
    }
}
