//! CLI command definitions
//!
//! Defines all commands and arguments using clap derive macros.
//!
//! ## Commands
//!
//! - `run` - Execute the benchmark workload against BigQuery
//! - `harness` - Drive the full prepare/run/cleanup lifecycle remotely

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// =============================================================================
// Main CLI
// =============================================================================

/// bqbench - BigQuery search-index benchmark
#[derive(Parser, Debug)]
#[command(name = "bqbench")]
#[command(about = "BigQuery search-index benchmark", long_about = None)]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// =============================================================================
// Commands
// =============================================================================

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute the benchmark workload and print one JSON result line
    Run {
        /// Project to bill jobs to
        #[arg(long)]
        project_id: Option<String>,

        /// Dataset the benchmark tables live in
        #[arg(long)]
        dataset_id: Option<String>,

        /// Table to load data into
        #[arg(long)]
        table_id: Option<String>,

        /// Table to create with an index
        #[arg(long)]
        indexed_table_id: Option<String>,

        /// Query to run (supports {project}/{dataset}/{table} placeholders)
        #[arg(long)]
        query: Option<String>,

        /// URI of the newline-delimited JSON data to load
        #[arg(long)]
        source_uri: Option<String>,

        /// Name of the search index to create
        #[arg(long)]
        index_id: Option<String>,

        /// Seconds between index-readiness checks
        #[arg(long)]
        poll_interval_secs: Option<u64>,

        /// Give up after this many readiness checks (default: poll forever)
        #[arg(long)]
        poll_max_attempts: Option<u32>,

        /// Run against an in-memory engine stub instead of BigQuery
        #[arg(long)]
        stub: bool,
    },

    /// Drive prepare/run/cleanup against a remote benchmark host
    Harness {
        /// SSH target of the benchmark host (user@host or a config alias)
        #[arg(long)]
        host: String,

        /// Project to bill jobs to
        #[arg(long)]
        project_id: Option<String>,

        /// Dataset to create tables in and delete afterwards
        #[arg(long)]
        dataset_id: Option<String>,

        /// Provisioning spec TOML (cloud, scopes, VM shape)
        #[arg(long)]
        spec: Option<PathBuf>,

        /// Local workload binary to push to the host
        #[arg(long, default_value = "target/release/bqbench")]
        workload: PathBuf,
    },
}
