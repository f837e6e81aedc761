//! parbench - compare thread-pool, process-pool, and cooperative-async
//! execution on CPU-bound and I/O-bound workloads

use anyhow::Result;
use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

mod benchmark;
mod config;
mod metrics;
mod server;
mod strategy;
mod utils;
mod workload;

use benchmark::Orchestrator;
use config::{BenchCommand, BenchConfig, CliArgs};

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn print_banner(config: &BenchConfig) {
    if config.quiet {
        return;
    }
    let cores = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    println!(
        "parbench v{} | PID: {} | CPU cores: {}",
        env!("CARGO_PKG_VERSION"),
        std::process::id(),
        cores
    );
    println!("Config: {}", config.summary());
    println!();
}

fn print_hints(config: &BenchConfig) {
    if config.quiet {
        return;
    }
    println!("Interpretation hints:");
    println!("- Rust threads have no interpreter lock: expect threads to track processes");
    println!("  on CPU-bound work, unlike runtimes that serialize bytecode execution.");
    println!("- I/O-bound: threads and async usually perform well; processes pay");
    println!("  per-task spawn and serialization overhead.");
}

fn run(config: BenchConfig) -> Result<()> {
    print_banner(&config);

    let orchestrator = Orchestrator::new(config.clone());
    let results = orchestrator.run_all()?;

    metrics::print_table(config.mode.title(), &results);
    print_hints(&config);

    if let Some(ref path) = config.output {
        metrics::write_json(path, &config.summary(), &results)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
        if !config.quiet {
            println!("Results written to {}", path.display());
        }
    }

    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    let config = match args.command {
        BenchCommand::Worker => {
            // Worker mode owns stdout for the task protocol; no logging,
            // no banner.
            if let Err(e) = strategy::run_worker_stdio() {
                eprintln!("worker: {e}");
                std::process::exit(1);
            }
            return;
        }
        BenchCommand::Cpu(ref cpu) => {
            setup_logging(cpu.common.verbose, cpu.common.quiet);
            BenchConfig::from_cpu(cpu)
        }
        BenchCommand::Io(ref io) => {
            setup_logging(io.common.verbose, io.common.quiet);
            BenchConfig::from_io(io)
        }
    };

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(config) {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
