//! Configuration file handling for the benchmark
//!
//! Run parameters resolve in this order (later overrides earlier):
//! 1. Hard-coded defaults
//! 2. Config file (`~/.config/bqbench/config.toml`)
//! 3. Environment variables (`BQBENCH_PROJECT_ID`, `BQBENCH_DATASET_ID`)
//! 4. Command-line arguments
//!
//! ## Example Config File
//!
//! ```toml
//! project_id = "my-project"
//! table_id = "unindexed_table"
//! indexed_table_id = "indexed_table"
//! poll_interval_secs = 10
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bench::{PollConfig, RunParams};
use crate::bigquery::{BigQueryError, TableRef};

/// Run parameters for one benchmark invocation.
///
/// Every field has a documented default except the project and dataset,
/// which must be supplied by the file, the environment, or a flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Project the benchmark bills jobs to.
    #[serde(default)]
    pub project_id: Option<String>,

    /// Dataset the tables are created in. Created and destroyed per run.
    #[serde(default)]
    pub dataset_id: Option<String>,

    /// Table the source data is loaded into.
    #[serde(default = "default_table_id")]
    pub table_id: String,

    /// Table materialized from `table_id` and then indexed.
    #[serde(default = "default_indexed_table_id")]
    pub indexed_table_id: String,

    /// Query to time, with `{project}`/`{dataset}`/`{table}` placeholders.
    #[serde(default = "default_query")]
    pub query: String,

    /// Newline-delimited JSON source to load, schema auto-detected.
    #[serde(default = "default_source_uri")]
    pub source_uri: String,

    /// Name of the search index to create.
    #[serde(default = "default_index_id")]
    pub index_id: String,

    /// Seconds between index-readiness checks.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Bound on readiness checks; absent means poll until built.
    #[serde(default)]
    pub poll_max_attempts: Option<u32>,
}

fn default_table_id() -> String {
    "unindexed_table".to_string()
}

fn default_indexed_table_id() -> String {
    "indexed_table".to_string()
}

fn default_query() -> String {
    "SELECT * FROM `{project}.{dataset}.{table}` WHERE SEARCH(review, \"good\")".to_string()
}

fn default_source_uri() -> String {
    "gs://pkb-yellore-data/yellore-json-data/review.json".to_string()
}

fn default_index_id() -> String {
    "review_index".to_string()
}

fn default_poll_interval_secs() -> u64 {
    10
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            dataset_id: None,
            table_id: default_table_id(),
            indexed_table_id: default_indexed_table_id(),
            query: default_query(),
            source_uri: default_source_uri(),
            index_id: default_index_id(),
            poll_interval_secs: default_poll_interval_secs(),
            poll_max_attempts: None,
        }
    }
}

/// Errors from configuration resolution
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting: {0} (set it in the config file, {1}, or via the flag)")]
    Missing(&'static str, &'static str),

    #[error(transparent)]
    Identifier(#[from] BigQueryError),
}

impl BenchConfig {
    /// Default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bqbench")
            .join("config.toml")
    }

    /// Load from the default path, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load from a specific path.
    ///
    /// Returns defaults if the file doesn't exist or can't be parsed.
    pub fn load_from(path: PathBuf) -> Self {
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::debug!("loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    tracing::warn!("failed to parse config at {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!("config file not found at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    /// Apply `BQBENCH_PROJECT_ID`/`BQBENCH_DATASET_ID` overrides.
    ///
    /// Called between the file load and the flag merge, so the environment
    /// overrides the config file but explicit flags still win.
    pub fn apply_env(&mut self) {
        if let Ok(project) = std::env::var("BQBENCH_PROJECT_ID") {
            self.project_id = Some(project);
        }
        if let Ok(dataset) = std::env::var("BQBENCH_DATASET_ID") {
            self.dataset_id = Some(dataset);
        }
    }

    /// Resolve into validated run parameters.
    pub fn resolve(&self) -> Result<RunParams, ConfigError> {
        let project = self
            .project_id
            .clone()
            .ok_or(ConfigError::Missing("project_id", "BQBENCH_PROJECT_ID"))?;
        let dataset = self
            .dataset_id
            .clone()
            .ok_or(ConfigError::Missing("dataset_id", "BQBENCH_DATASET_ID"))?;

        let unindexed = TableRef::new(project, dataset, self.table_id.clone())?;
        let indexed = unindexed.sibling(self.indexed_table_id.clone())?;

        let mut poll =
            PollConfig::default().with_interval(Duration::from_secs(self.poll_interval_secs));
        if let Some(attempts) = self.poll_max_attempts {
            poll = poll.with_max_attempts(attempts);
        }

        Ok(RunParams {
            unindexed,
            indexed,
            source_uri: self.source_uri.clone(),
            index_id: self.index_id.clone(),
            query_template: self.query.clone(),
            poll,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn base_config() -> BenchConfig {
        BenchConfig {
            project_id: Some("proj".to_string()),
            dataset_id: Some("ds1".to_string()),
            ..BenchConfig::default()
        }
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let config = BenchConfig::default();
        assert_eq!(config.table_id, "unindexed_table");
        assert_eq!(config.indexed_table_id, "indexed_table");
        assert_eq!(config.index_id, "review_index");
        assert_eq!(config.poll_interval_secs, 10);
        assert!(config.poll_max_attempts.is_none());
        assert!(config.query.contains("SEARCH(review"));
    }

    #[test]
    fn test_resolve_requires_project_and_dataset() {
        let config = BenchConfig::default();
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::Missing("project_id", _))
        ));
    }

    // Must stay the only test that touches the BQBENCH_* environment;
    // tests share the process.
    #[test]
    fn test_env_overrides_file_but_leaves_unset_vars_alone() {
        std::env::remove_var("BQBENCH_DATASET_ID");
        std::env::set_var("BQBENCH_PROJECT_ID", "env-proj");

        let mut config = BenchConfig {
            project_id: Some("file-proj".to_string()),
            dataset_id: Some("file-ds".to_string()),
            ..BenchConfig::default()
        };
        config.apply_env();

        assert_eq!(config.project_id.as_deref(), Some("env-proj"));
        assert_eq!(config.dataset_id.as_deref(), Some("file-ds"));

        std::env::remove_var("BQBENCH_PROJECT_ID");
    }

    #[test]
    fn test_resolve_builds_sibling_tables() {
        let params = base_config().resolve().unwrap();
        assert_eq!(params.unindexed.to_string(), "proj.ds1.unindexed_table");
        assert_eq!(params.indexed.to_string(), "proj.ds1.indexed_table");
        assert_eq!(params.poll.interval, Duration::from_secs(10));
        assert!(params.poll.max_attempts.is_none());
    }

    #[test]
    fn test_resolve_rejects_malformed_dataset() {
        let config = BenchConfig {
            dataset_id: Some("ds1`; DROP".to_string()),
            ..base_config()
        };
        assert!(matches!(config.resolve(), Err(ConfigError::Identifier(_))));
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "project_id = \"proj\"\npoll_interval_secs = 3\n").unwrap();

        let config = BenchConfig::load_from(path);
        assert_eq!(config.project_id.as_deref(), Some("proj"));
        assert_eq!(config.poll_interval_secs, 3);
        assert_eq!(config.table_id, "unindexed_table");
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let config = BenchConfig::load_from(PathBuf::from("/nonexistent/config.toml"));
        assert!(config.project_id.is_none());
        assert_eq!(config.poll_interval_secs, 10);
    }
}
