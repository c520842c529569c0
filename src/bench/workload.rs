//! The benchmark workload
//!
//! Strictly sequential: load data into an unindexed table, materialize an
//! indexed copy, add a search index, wait for the build to finish, then run
//! the search query under a timer. Each engine operation completes before
//! the next begins; failures abort the run without retry.

use serde::{Deserialize, Serialize};

use crate::bench::poller::{wait_for_index, PollConfig, PollError, Sleeper};
use crate::bench::timer::time_query;
use crate::bigquery::{statements, BigQueryClient, BigQueryError, TableRef};

/// Fully resolved parameters for one workload run.
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Table the source data is loaded into.
    pub unindexed: TableRef,
    /// Table materialized from the unindexed one and then indexed.
    pub indexed: TableRef,
    /// Newline-delimited JSON source, schema auto-detected.
    pub source_uri: String,
    /// Name of the search index to create.
    pub index_id: String,
    /// Query template; `{project}`, `{dataset}`, `{table}` are substituted
    /// with the indexed table's components.
    pub query_template: String,
    /// Readiness polling cadence.
    pub poll: PollConfig,
}

/// Result of one workload run, emitted as a single JSON line on stdout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadReport {
    /// Wall-clock seconds the search query took.
    pub execution_time: f64,
}

impl WorkloadReport {
    /// The one-line JSON form consumed by the harness.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Errors from the workload, tagged by the stage that failed
#[derive(Debug, thiserror::Error)]
pub enum WorkloadError {
    #[error("loading source data failed: {0}")]
    Load(#[source] BigQueryError),

    #[error("materializing indexed table failed: {0}")]
    CreateTable(#[source] BigQueryError),

    #[error("adding search index failed: {0}")]
    AddIndex(#[source] BigQueryError),

    #[error("waiting for search index failed: {0}")]
    IndexWait(#[from] PollError),

    #[error("timed query failed: {0}")]
    Query(#[source] BigQueryError),
}

/// Run the workload end to end and report the timed query's duration.
pub async fn run<C, S>(
    client: &C,
    params: &RunParams,
    sleeper: &S,
) -> Result<WorkloadReport, WorkloadError>
where
    C: BigQueryClient + ?Sized,
    S: Sleeper + ?Sized,
{
    tracing::info!("loading {} into {}", params.source_uri, params.unindexed);
    client
        .load_from_uri(&params.unindexed, &params.source_uri)
        .await
        .map_err(WorkloadError::Load)?;

    tracing::info!("materializing {} from {}", params.indexed, params.unindexed);
    client
        .query(&statements::create_table_as_select(
            &params.indexed,
            &params.unindexed,
        ))
        .await
        .map_err(WorkloadError::CreateTable)?;

    tracing::info!("adding search index {} on {}", params.index_id, params.indexed);
    let alter = statements::add_search_index(&params.indexed, &params.index_id)
        .map_err(WorkloadError::AddIndex)?;
    client.query(&alter).await.map_err(WorkloadError::AddIndex)?;

    let checks = wait_for_index(client, &params.indexed, &params.poll, sleeper).await?;
    tracing::info!("search index built after {} readiness checks", checks);

    let sql = statements::render_query(&params.query_template, &params.indexed);
    let execution_time = time_query(client, &sql)
        .await
        .map_err(WorkloadError::Query)?;
    tracing::info!("search query completed in {:.3}s", execution_time);

    Ok(WorkloadReport { execution_time })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::poller::TokioSleeper;
    use crate::bigquery::{EngineCall, StubBigQuery};
    use std::time::Duration;

    fn params() -> RunParams {
        let unindexed = TableRef::new("proj", "ds1", "unindexed_table").unwrap();
        let indexed = unindexed.sibling("indexed_table").unwrap();
        RunParams {
            unindexed,
            indexed,
            source_uri: "gs://bucket/review.json".to_string(),
            index_id: "review_index".to_string(),
            query_template:
                "SELECT * FROM `{project}.{dataset}.{table}` WHERE SEARCH(review, \"good\")"
                    .to_string(),
            poll: PollConfig::default().with_interval(Duration::from_millis(1)),
        }
    }

    #[tokio::test]
    async fn test_call_sequence_end_to_end() {
        let stub = StubBigQuery::new().with_building_rounds(2);

        let report = run(&stub, &params(), &TokioSleeper).await.unwrap();
        assert!(report.execution_time >= 0.0);

        let calls = stub.calls();
        // load -> create-as-select -> alter-add-index -> metadata fetches -> query
        assert!(matches!(
            &calls[0],
            EngineCall::Load { table, uri }
                if table == "proj.ds1.unindexed_table" && uri == "gs://bucket/review.json"
        ));
        assert!(
            matches!(&calls[1], EngineCall::Query { sql } if sql.starts_with("CREATE TABLE"))
        );
        assert!(
            matches!(&calls[2], EngineCall::Query { sql } if sql.starts_with("ALTER TABLE"))
        );

        let metadata_fetches = calls
            .iter()
            .filter(|c| matches!(c, EngineCall::Metadata { .. }))
            .count();
        assert_eq!(metadata_fetches, 3);
        assert!(calls[3..6]
            .iter()
            .all(|c| matches!(c, EngineCall::Metadata { .. })));

        assert!(matches!(
            &calls[6],
            EngineCall::Query { sql }
                if sql == "SELECT * FROM `proj.ds1.indexed_table` WHERE SEARCH(review, \"good\")"
        ));
        assert_eq!(calls.len(), 7);
    }

    #[tokio::test]
    async fn test_report_is_a_single_flat_json_object() {
        let stub = StubBigQuery::new();
        let report = run(&stub, &params(), &TokioSleeper).await.unwrap();

        let line = report.to_json_line().unwrap();
        assert!(!line.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object["execution_time"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn test_timer_excludes_polling_time() {
        // Index takes several slow polling rounds to build; the query itself
        // is instant. The reported time must reflect only the query span.
        let stub = StubBigQuery::new().with_building_rounds(3);
        let mut p = params();
        p.poll = PollConfig::default().with_interval(Duration::from_millis(30));

        let report = run(&stub, &p, &TokioSleeper).await.unwrap();
        assert!(
            report.execution_time < 0.03,
            "polling delay leaked into the measurement: {}",
            report.execution_time
        );
    }

    #[tokio::test]
    async fn test_metadata_failure_aborts_run() {
        let stub = StubBigQuery::new();
        stub.push_metadata(Err("index lookup failed".to_string()));

        let err = run(&stub, &params(), &TokioSleeper).await.unwrap_err();
        assert!(matches!(err, WorkloadError::IndexWait(_)));

        // No query was timed after the failed readiness check.
        assert!(!stub.calls().iter().any(
            |c| matches!(c, EngineCall::Query { sql } if sql.contains("SEARCH(review")),
        ));
    }

    #[tokio::test]
    async fn test_invalid_index_name_fails_before_alter() {
        let stub = StubBigQuery::new();
        let mut p = params();
        p.index_id = "bad`name".to_string();

        let err = run(&stub, &p, &TokioSleeper).await.unwrap_err();
        assert!(matches!(err, WorkloadError::AddIndex(_)));
        // Load and create ran; the malformed ALTER was never issued.
        assert_eq!(stub.calls().len(), 2);
    }
}
