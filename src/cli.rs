use clap::Parser;
use std::path::PathBuf;

use jmx_collector::config::CliOverrides;

/// What a run of the binary does once configuration is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Start the helper, run one collection cycle, stop the helper
    Collect,
    /// Start the helper, print its statistics, stop the helper
    Stats,
    /// Validate catalog and inventory and print the job plan; no helper
    DryRun,
}

/// Collect JMX metrics from a fleet of application server domains
#[derive(Parser, Debug)]
#[command(name = "jmx-collector")]
#[command(version)]
#[command(about = "Collect JMX metrics from application server domains through a Nailgun helper", long_about = None)]
pub struct Args {
    /// Path to the config file (defaults to ./jmx-collector.config.yml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of concurrent workers, overriding concurrent_workers
    #[arg(short, long, value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Log level: ALL, DEBUG, INFO, WARNING or ERROR
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print helper process statistics and exit
    #[arg(long, conflicts_with = "dry_run")]
    pub stats: bool,

    /// Load and validate catalog and inventory, print the job plan, and exit
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn mode(&self) -> RunMode {
        if self.dry_run {
            RunMode::DryRun
        } else if self.stats {
            RunMode::Stats
        } else {
            RunMode::Collect
        }
    }

    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            workers: self.workers,
            log_level: self.log_level.clone(),
        }
    }
}
