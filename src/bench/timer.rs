//! Timed query execution

use std::time::Instant;

use crate::bigquery::{BigQueryClient, BigQueryError};

/// Execute `sql` and measure wall-clock elapsed time in seconds.
///
/// The timer covers exactly the query span: it starts immediately before the
/// query is issued and stops once the engine reports completion. Uses the
/// monotonic clock, so the result is never negative.
pub async fn time_query<C>(client: &C, sql: &str) -> Result<f64, BigQueryError>
where
    C: BigQueryClient + ?Sized,
{
    let started = Instant::now();
    client.query(sql).await?;
    Ok(started.elapsed().as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigquery::{EngineCall, StubBigQuery};
    use std::time::Duration;

    #[tokio::test]
    async fn test_elapsed_is_non_negative() {
        let stub = StubBigQuery::new();
        let elapsed = time_query(&stub, "SELECT 1").await.unwrap();
        assert!(elapsed >= 0.0);
    }

    #[tokio::test]
    async fn test_elapsed_covers_query_duration() {
        let stub = StubBigQuery::new().with_query_delay(Duration::from_millis(50));
        let elapsed = time_query(&stub, "SELECT 1").await.unwrap();
        assert!(elapsed >= 0.05, "elapsed {} below query delay", elapsed);
    }

    #[tokio::test]
    async fn test_only_the_query_is_issued() {
        let stub = StubBigQuery::new();
        time_query(&stub, "SELECT review FROM t").await.unwrap();
        assert_eq!(
            stub.calls(),
            vec![EngineCall::Query {
                sql: "SELECT review FROM t".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_query_failure_propagates() {
        // The stub only scripts metadata failures, so exercise the error
        // path through a client whose tool is missing.
        let client = crate::bigquery::BqTool::new("proj").with_program("/nonexistent/bq-tool");
        assert!(time_query(&client, "SELECT 1").await.is_err());
    }
}
