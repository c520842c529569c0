//! bqbench CLI - BigQuery search-index benchmark
//!
//! Two entry points:
//! - `run`: the workload itself (load, index, poll, timed query) printing
//!   one JSON line; this is what the harness pushes to the benchmark host.
//! - `harness`: the control-process side, driving prepare/run/cleanup over
//!   a remote host and printing the resulting sample.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bqbench::bench::{self, TokioSleeper};
use bqbench::bigquery::{BqTool, StubBigQuery};
use bqbench::cli::{BenchConfig, Cli, Commands};
use bqbench::harness::{HarnessSpec, IndexSearchBenchmark, SshHost};

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable; quiet unless
    // --verbose is given.
    let filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => BenchConfig::load_from(path.clone()),
        None => BenchConfig::load(),
    };
    // Environment sits between the config file and the flags.
    config.apply_env();

    match cli.command {
        Commands::Run {
            project_id,
            dataset_id,
            table_id,
            indexed_table_id,
            query,
            source_uri,
            index_id,
            poll_interval_secs,
            poll_max_attempts,
            stub,
        } => {
            let config = merge_run_flags(
                config,
                project_id,
                dataset_id,
                table_id,
                indexed_table_id,
                query,
                source_uri,
                index_id,
                poll_interval_secs,
                poll_max_attempts,
            );
            handle_run(&config, stub).await?;
        }

        Commands::Harness {
            host,
            project_id,
            dataset_id,
            spec,
            workload,
        } => {
            let config = BenchConfig {
                project_id: project_id.or(config.project_id),
                dataset_id: dataset_id.or(config.dataset_id),
                ..config
            };
            handle_harness(&config, &host, spec, workload).await?;
        }
    }

    Ok(())
}

// =============================================================================
// Command Handlers
// =============================================================================

#[allow(clippy::too_many_arguments)]
fn merge_run_flags(
    config: BenchConfig,
    project_id: Option<String>,
    dataset_id: Option<String>,
    table_id: Option<String>,
    indexed_table_id: Option<String>,
    query: Option<String>,
    source_uri: Option<String>,
    index_id: Option<String>,
    poll_interval_secs: Option<u64>,
    poll_max_attempts: Option<u32>,
) -> BenchConfig {
    BenchConfig {
        project_id: project_id.or(config.project_id),
        dataset_id: dataset_id.or(config.dataset_id),
        table_id: table_id.unwrap_or(config.table_id),
        indexed_table_id: indexed_table_id.unwrap_or(config.indexed_table_id),
        query: query.unwrap_or(config.query),
        source_uri: source_uri.unwrap_or(config.source_uri),
        index_id: index_id.unwrap_or(config.index_id),
        poll_interval_secs: poll_interval_secs.unwrap_or(config.poll_interval_secs),
        poll_max_attempts: poll_max_attempts.or(config.poll_max_attempts),
    }
}

/// Run the workload in place and print its one-line JSON report.
async fn handle_run(config: &BenchConfig, stub: bool) -> anyhow::Result<()> {
    let params = config.resolve()?;

    let report = if stub {
        tracing::info!("running against the in-memory engine stub");
        let client = StubBigQuery::new();
        bench::run(&client, &params, &TokioSleeper).await?
    } else {
        let client = BqTool::new(params.unindexed.project());
        bench::run(&client, &params, &TokioSleeper).await?
    };

    println!("{}", report.to_json_line()?);
    Ok(())
}

/// Drive the full lifecycle against a remote host and print the sample.
async fn handle_harness(
    config: &BenchConfig,
    host: &str,
    spec: Option<PathBuf>,
    workload: PathBuf,
) -> anyhow::Result<()> {
    let params = config.resolve()?;
    let project = params.unindexed.project();
    let dataset = params.unindexed.dataset();

    let spec = match spec {
        Some(path) => HarnessSpec::load_from(&path)?,
        None => HarnessSpec::default(),
    };

    let benchmark = IndexSearchBenchmark::new(SshHost::new(host), spec, workload);
    benchmark.prepare().await?;

    // Capture the run result before cleanup; cleanup is best-effort and must
    // not disturb an already-produced sample.
    let run_result = benchmark.run(project, dataset).await;
    benchmark.cleanup(project, dataset).await;
    let sample = run_result?;

    println!("{}", serde_json::to_string(&sample)?);
    Ok(())
}
