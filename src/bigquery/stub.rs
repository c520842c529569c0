//! Scripted in-memory engine client
//!
//! Stands in for BigQuery when no real engine is reachable: records every
//! call and replays a scripted sequence of metadata responses. Used by the
//! `--stub` run mode and throughout the tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::client::BigQueryClient;
use super::types::{BigQueryError, SearchIndex, TableMetadata, TableRef};

/// One recorded engine call, in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    /// `load_from_uri(table, uri)`
    Load { table: String, uri: String },
    /// `query(sql)`
    Query { sql: String },
    /// `table_metadata(table)`
    Metadata { table: String },
}

/// Scripted stand-in for the query engine.
#[derive(Debug, Default)]
pub struct StubBigQuery {
    calls: Mutex<Vec<EngineCall>>,
    metadata_script: Mutex<VecDeque<Result<TableMetadata, String>>>,
    query_delay: Option<Duration>,
}

impl StubBigQuery {
    /// Engine whose tables always report a built index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `n` "index still building" responses before the index reports
    /// built. With `n = 0` the first metadata fetch already sees a built
    /// index.
    pub fn with_building_rounds(self, n: usize) -> Self {
        {
            let mut script = self.metadata_script.lock().unwrap();
            for _ in 0..n {
                script.push_back(Ok(building_metadata()));
            }
            script.push_back(Ok(ready_metadata()));
        }
        self
    }

    /// Queue an explicit metadata response.
    pub fn push_metadata(&self, response: Result<TableMetadata, String>) {
        self.metadata_script.lock().unwrap().push_back(response);
    }

    /// Make every `query` call take at least `delay` before completing.
    pub fn with_query_delay(mut self, delay: Duration) -> Self {
        self.query_delay = Some(delay);
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Metadata for a table whose index build has completed.
pub fn ready_metadata() -> TableMetadata {
    TableMetadata {
        search_indexes: vec![SearchIndex {
            name: "review_index".to_string(),
            status: "ACTIVE".to_string(),
        }],
    }
}

/// Metadata for a table whose index is still building.
pub fn building_metadata() -> TableMetadata {
    TableMetadata {
        search_indexes: vec![SearchIndex {
            name: "review_index".to_string(),
            status: "PENDING".to_string(),
        }],
    }
}

#[async_trait]
impl BigQueryClient for StubBigQuery {
    async fn load_from_uri(
        &self,
        table: &TableRef,
        source_uri: &str,
    ) -> Result<(), BigQueryError> {
        self.record(EngineCall::Load {
            table: table.to_string(),
            uri: source_uri.to_string(),
        });
        Ok(())
    }

    async fn query(&self, sql: &str) -> Result<(), BigQueryError> {
        self.record(EngineCall::Query {
            sql: sql.to_string(),
        });
        if let Some(delay) = self.query_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn table_metadata(&self, table: &TableRef) -> Result<TableMetadata, BigQueryError> {
        self.record(EngineCall::Metadata {
            table: table.to_string(),
        });
        let next = self.metadata_script.lock().unwrap().pop_front();
        match next {
            Some(Ok(metadata)) => Ok(metadata),
            Some(Err(stderr)) => Err(BigQueryError::Tool { status: 1, stderr }),
            // Script exhausted (or never set): the index is built.
            None => Ok(ready_metadata()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_metadata_order() {
        let stub = StubBigQuery::new().with_building_rounds(2);
        let table = TableRef::new("proj", "ds1", "indexed_table").unwrap();

        assert!(!stub.table_metadata(&table).await.unwrap().has_built_index());
        assert!(!stub.table_metadata(&table).await.unwrap().has_built_index());
        assert!(stub.table_metadata(&table).await.unwrap().has_built_index());
        // Script exhausted: stays built.
        assert!(stub.table_metadata(&table).await.unwrap().has_built_index());
    }

    #[tokio::test]
    async fn test_scripted_error_surfaces_as_tool_error() {
        let stub = StubBigQuery::new();
        stub.push_metadata(Err("permission denied".to_string()));
        let table = TableRef::new("proj", "ds1", "indexed_table").unwrap();

        let err = stub.table_metadata(&table).await.unwrap_err();
        assert!(matches!(err, BigQueryError::Tool { status: 1, .. }));
    }

    #[tokio::test]
    async fn test_calls_recorded_in_order() {
        let stub = StubBigQuery::new();
        let table = TableRef::new("proj", "ds1", "unindexed_table").unwrap();

        stub.load_from_uri(&table, "gs://bucket/data.json")
            .await
            .unwrap();
        stub.query("SELECT 1").await.unwrap();

        let calls = stub.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], EngineCall::Load { .. }));
        assert!(matches!(calls[1], EngineCall::Query { .. }));
    }
}
