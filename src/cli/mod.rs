//! CLI module
//!
//! ## Usage
//!
//! ```bash
//! # Run the workload in place (the harness invokes this remotely)
//! bqbench run --project-id my-project --dataset-id run_1234
//!
//! # Smoke-test the workload without BigQuery access
//! bqbench run --project-id p --dataset-id d --stub
//!
//! # Full lifecycle against a remote host
//! bqbench harness --host bench@vm --project-id my-project --dataset-id run_1234
//! ```
//!
//! ## Module Structure
//!
//! - `commands`: CLI command definitions using clap
//! - `config`: Configuration file handling

pub mod commands;
pub mod config;

// Re-exports for convenience
pub use commands::{Cli, Commands};
pub use config::{BenchConfig, ConfigError};
