mod cli;

use anyhow::Context;
use cli::{Args, RunMode};
use jmx_collector::application::use_cases::load_policies;
use jmx_collector::config::{discover_config, load_config_from_path, CollectorSettings};
use jmx_collector::prelude::*;
use jmx_collector::shared::error::ExitCode;
use jmx_collector::shared::logging::init_logging;
use std::process;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

type FleetCollector = MetricsCollector<
    FileSystemReader,
    FileSystemReader,
    NailgunHelper,
    NailgunClient,
    StderrProgressReporter,
>;

#[tokio::main]
async fn main() {
    // clap exits with code 2 on invalid arguments
    let args = Args::parse_args();

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let working_dir =
        std::env::current_dir().context("Failed to determine the working directory")?;

    let config = match &args.config {
        Some(path) => load_config_from_path(path)?,
        None => discover_config(&working_dir)?.unwrap_or_default(),
    };
    let settings = CollectorSettings::resolve(config, &args.overrides(), &working_dir)?;
    init_logging(settings.log_level, &settings.log_dir)?;

    let presenter: Box<dyn OutputPresenter> = match &args.output {
        Some(path) => Box::new(FileSystemWriter::new(path.clone())),
        None => Box::new(StdoutPresenter::new()),
    };

    match args.mode() {
        RunMode::DryRun => dry_run(&settings, presenter.as_ref()),
        RunMode::Stats => stats(&settings, presenter.as_ref()).await,
        RunMode::Collect => collect(&settings, presenter.as_ref()).await,
    }
}

/// Validates catalog and inventory and prints what a cycle would do.
fn dry_run(settings: &CollectorSettings, presenter: &dyn OutputPresenter) -> Result<ExitCode> {
    let reader = FileSystemReader::new();
    let options = settings.collector_options();

    let catalog = MetricCatalog::load(&reader, &options.catalog)?;
    let targets = reader.read_targets(&options.inventory_file)?;
    let policies = load_policies(&reader, &options);
    eprintln!(
        "📋 {} target(s), {} metric definition(s), {} worker(s)",
        targets.len(),
        catalog.total_definitions(),
        options.workers
    );

    let plan = plan_cycle(targets, &catalog, &policies);
    presenter.present(&serde_json::to_string_pretty(&plan)?)?;
    Ok(ExitCode::Success)
}

async fn start_collector(settings: &CollectorSettings) -> Result<FleetCollector> {
    let collector = MetricsCollector::start(
        settings.collector_options(),
        FileSystemReader::new(),
        FileSystemReader::new(),
        NailgunHelper::new(settings.launch_config()?),
        Arc::new(settings.client()),
        Arc::new(StderrProgressReporter::new()),
    )
    .await?;
    Ok(collector)
}

async fn stop_collector(collector: &FleetCollector) {
    if let Err(e) = collector.shutdown().await {
        tracing::warn!("Helper did not stop cleanly: {}", e);
    }
}

async fn stats(settings: &CollectorSettings, presenter: &dyn OutputPresenter) -> Result<ExitCode> {
    let collector = start_collector(settings).await?;
    let outcome = collector.helper_stats().await;
    stop_collector(&collector).await;

    presenter.present(&outcome?)?;
    Ok(ExitCode::Success)
}

async fn collect(settings: &CollectorSettings, presenter: &dyn OutputPresenter) -> Result<ExitCode> {
    let collector = start_collector(settings).await?;

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling collection");
                cancel.cancel();
            }
        })
    };

    let outcome = collector.collect_with_cancel(cancel).await;
    interrupt.abort();
    stop_collector(&collector).await;

    let response = outcome?;
    presenter.present(&serde_json::to_string_pretty(&response.results)?)?;

    if response.has_failures() {
        Ok(ExitCode::PartialCollection)
    } else {
        Ok(ExitCode::Success)
    }
}
