//! `bq` command-line client
//!
//! Production [`BigQueryClient`] that drives the Cloud SDK's `bq` tool as a
//! subprocess. Stdout is machine-readable (`--format=json` where the output
//! matters); stderr from a failed invocation is carried into the error.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use super::client::BigQueryClient;
use super::types::{BigQueryError, SearchIndex, TableMetadata, TableRef};

/// Client that shells out to the `bq` CLI.
#[derive(Debug, Clone)]
pub struct BqTool {
    program: PathBuf,
    project: String,
}

impl BqTool {
    /// Create a client that runs `bq` from `PATH`, billing jobs to `project`.
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            program: PathBuf::from("bq"),
            project: project.into(),
        }
    }

    /// Override the `bq` executable path.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    async fn invoke(&self, args: &[&str]) -> Result<String, BigQueryError> {
        tracing::debug!("bq {}", args.join(" "));
        let output = Command::new(&self.program).args(args).output().await?;
        if !output.status.success() {
            return Err(BigQueryError::Tool {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Row shape returned by the search-index metadata query.
#[derive(Debug, Deserialize)]
struct IndexRow {
    index_name: String,
    index_status: String,
}

#[async_trait]
impl BigQueryClient for BqTool {
    async fn load_from_uri(
        &self,
        table: &TableRef,
        source_uri: &str,
    ) -> Result<(), BigQueryError> {
        let destination = format!("{}.{}", table.dataset(), table.table());
        let project_flag = format!("--project_id={}", table.project());
        self.invoke(&[
            "load",
            &project_flag,
            "--source_format=NEWLINE_DELIMITED_JSON",
            "--autodetect",
            &destination,
            source_uri,
        ])
        .await?;
        Ok(())
    }

    async fn query(&self, sql: &str) -> Result<(), BigQueryError> {
        let project_flag = format!("--project_id={}", self.project);
        self.invoke(&[
            "query",
            &project_flag,
            "--nouse_legacy_sql",
            "--format=json",
            sql,
        ])
        .await?;
        Ok(())
    }

    async fn table_metadata(&self, table: &TableRef) -> Result<TableMetadata, BigQueryError> {
        // Index state lives in the dataset's INFORMATION_SCHEMA view, not in
        // `bq show` output. The table name was validated at construction, so
        // embedding it in the literal is safe.
        let sql = format!(
            "SELECT index_name, index_status \
             FROM `{}.{}.INFORMATION_SCHEMA.SEARCH_INDEXES` \
             WHERE table_name = '{}'",
            table.project(),
            table.dataset(),
            table.table()
        );
        let project_flag = format!("--project_id={}", self.project);
        let stdout = self
            .invoke(&[
                "query",
                &project_flag,
                "--nouse_legacy_sql",
                "--format=json",
                &sql,
            ])
            .await?;

        // An empty result set prints nothing rather than `[]`.
        let trimmed = stdout.trim();
        let rows: Vec<IndexRow> = if trimmed.is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(trimmed)?
        };

        Ok(TableMetadata {
            search_indexes: rows
                .into_iter()
                .map(|row| SearchIndex {
                    name: row.index_name,
                    status: row.index_status,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_row_parsing() {
        let rows: Vec<IndexRow> = serde_json::from_str(
            r#"[{"index_name": "review_index", "index_status": "ACTIVE"}]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].index_name, "review_index");
        assert_eq!(rows[0].index_status, "ACTIVE");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let client = BqTool::new("proj").with_program("/nonexistent/bq-tool");
        let table = TableRef::new("proj", "ds1", "t").unwrap();
        let err = client.table_metadata(&table).await.unwrap_err();
        assert!(matches!(err, BigQueryError::Spawn(_)));
    }
}
