//! Validated runtime configuration
//!
//! Built once from CLI arguments, then read-only for the whole run.

use std::path::PathBuf;
use std::time::Duration;

use super::cli::{CpuArgs, IoArgs};

/// Which workload shape this run benchmarks
#[derive(Debug, Clone)]
pub enum BenchMode {
    Cpu { units: u64 },
    Io { payload_size: usize, timeout: Duration },
}

impl BenchMode {
    pub fn title(&self) -> &'static str {
        match self {
            BenchMode::Cpu { .. } => "CPU-bound results (lower is better)",
            BenchMode::Io { .. } => "I/O-bound results (lower is better)",
        }
    }
}

/// Resolved configuration for one benchmark run
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub mode: BenchMode,
    pub tasks: u32,
    pub concurrency: u32,
    pub repeats: u32,
    pub warmup: u32,
    pub process_cap: u32,
    pub seed: u64,
    pub quiet: bool,
    pub output: Option<PathBuf>,
    /// Binary respawned in worker mode by the process-pool strategy
    pub worker_program: PathBuf,
}

impl BenchConfig {
    pub fn from_cpu(args: &CpuArgs) -> Result<Self, String> {
        args.common.validate(args.tasks, args.repeats)?;
        Ok(Self {
            mode: BenchMode::Cpu {
                units: args.cpu_units,
            },
            tasks: args.tasks,
            concurrency: args.common.effective_concurrency(),
            repeats: args.repeats,
            warmup: args.common.warmup,
            process_cap: args.common.process_cap,
            seed: args.common.seed,
            quiet: args.common.quiet,
            output: args.common.output.clone(),
            worker_program: self_program()?,
        })
    }

    pub fn from_io(args: &IoArgs) -> Result<Self, String> {
        args.common.validate(args.tasks, args.repeats)?;
        if args.io_timeout_ms == 0 {
            return Err("--io-timeout-ms must be at least 1".to_string());
        }
        Ok(Self {
            mode: BenchMode::Io {
                payload_size: args.payload_size,
                timeout: Duration::from_millis(args.io_timeout_ms),
            },
            tasks: args.tasks,
            concurrency: args.common.effective_concurrency(),
            repeats: args.repeats,
            warmup: args.common.warmup,
            process_cap: args.common.process_cap,
            seed: args.common.seed,
            quiet: args.common.quiet,
            output: args.common.output.clone(),
            worker_program: self_program()?,
        })
    }

    /// One-line config summary for the banner
    pub fn summary(&self) -> String {
        let shape = match &self.mode {
            BenchMode::Cpu { units } => format!("cpu-units={units}"),
            BenchMode::Io { payload_size, .. } => format!("payload-size={payload_size}"),
        };
        format!(
            "tasks={}, concurrency={}, repeats={}, warmup={}, {}",
            self.tasks, self.concurrency, self.repeats, self.warmup, shape
        )
    }
}

fn self_program() -> Result<PathBuf, String> {
    std::env::current_exe().map_err(|e| format!("Failed to locate own binary: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::{BenchCommand, CliArgs};
    use clap::Parser;

    fn cpu_config(args: &[&str]) -> Result<BenchConfig, String> {
        match CliArgs::parse_from(args).command {
            BenchCommand::Cpu(cpu) => BenchConfig::from_cpu(&cpu),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_from_cpu() {
        let config = cpu_config(&["parbench", "cpu", "-c", "2"]).expect("config");
        assert_eq!(config.tasks, 20);
        assert_eq!(config.concurrency, 2);
        assert!(matches!(config.mode, BenchMode::Cpu { units: 200_000 }));
    }

    #[test]
    fn test_auto_concurrency_resolved() {
        let config = cpu_config(&["parbench", "cpu"]).expect("config");
        assert!(config.concurrency >= 1);
    }

    #[test]
    fn test_invalid_repeats_rejected() {
        assert!(cpu_config(&["parbench", "cpu", "--repeats", "0"]).is_err());
    }

    #[test]
    fn test_io_timeout_mapped() {
        let args = CliArgs::parse_from(["parbench", "io", "--io-timeout-ms", "500"]);
        let config = match args.command {
            BenchCommand::Io(io) => BenchConfig::from_io(&io).expect("config"),
            _ => unreachable!(),
        };
        match config.mode {
            BenchMode::Io { timeout, .. } => assert_eq!(timeout, Duration::from_millis(500)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_titles() {
        let config = cpu_config(&["parbench", "cpu"]).expect("config");
        assert_eq!(config.mode.title(), "CPU-bound results (lower is better)");
    }
}
