//! bqbench - BigQuery search-index benchmark
//!
//! Loads newline-delimited JSON into a table, materializes an indexed copy,
//! adds a search index, waits for the build to finish, and times a search
//! query. The measurement is reported as a single JSON line for the calling
//! harness.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bqbench::bench::{self, TokioSleeper};
//! use bqbench::bigquery::BqTool;
//! use bqbench::cli::BenchConfig;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let mut config = BenchConfig::default();
//! config.project_id = Some("my-project".to_string());
//! config.dataset_id = Some("run_1234".to_string());
//!
//! let params = config.resolve()?;
//! let client = BqTool::new(params.unindexed.project());
//! let report = bench::run(&client, &params, &TokioSleeper).await?;
//! println!("{}", report.to_json_line()?);
//! # Ok(())
//! # }
//! ```

pub mod bench;
pub mod bigquery;
pub mod cli;
pub mod harness;

// Re-exports for convenience
pub use bench::{
    time_query, wait_for_index, PollConfig, PollError, RunParams, Sample, Sleeper, TokioSleeper,
    WorkloadError, WorkloadReport,
};
pub use bigquery::{BigQueryClient, BigQueryError, BqTool, StubBigQuery, TableRef, TableMetadata};
pub use cli::{BenchConfig, ConfigError};
pub use harness::{HarnessSpec, IndexSearchBenchmark, RemoteHost, SshHost};
