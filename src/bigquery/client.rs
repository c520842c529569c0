//! Engine client seam
//!
//! The benchmark only needs three operations from the query engine; keeping
//! them behind a trait lets tests script the engine without network access.

use async_trait::async_trait;

use super::types::{BigQueryError, TableMetadata, TableRef};

/// Operations the benchmark performs against the query engine.
///
/// Every call is awaited to completion before the caller proceeds; there is
/// no retry layer here. Failures propagate and abort the run.
#[async_trait]
pub trait BigQueryClient: Send + Sync {
    /// Load newline-delimited JSON from `source_uri` into `table`, with the
    /// schema auto-detected. Returns once the load job has completed.
    async fn load_from_uri(&self, table: &TableRef, source_uri: &str)
        -> Result<(), BigQueryError>;

    /// Execute a statement and wait for it to complete. Result rows, if any,
    /// are discarded.
    async fn query(&self, sql: &str) -> Result<(), BigQueryError>;

    /// Fetch the table's current metadata, including its search indexes.
    async fn table_metadata(&self, table: &TableRef) -> Result<TableMetadata, BigQueryError>;
}
