//! Index-readiness polling
//!
//! After `ALTER TABLE ... ADD SEARCH INDEX` returns, the index build
//! continues asynchronously inside the engine. The poller blocks until the
//! table's metadata reports a built index, sleeping a fixed interval between
//! checks.
//!
//! The loop is unbounded by default, matching the benchmark's historical
//! behavior; `max_attempts` bounds it for operators who want a deadline.
//! Fetch errors are not a retry case: they propagate immediately.

use std::time::Duration;

use async_trait::async_trait;

use crate::bigquery::{BigQueryClient, BigQueryError, TableRef};

/// Polling cadence and optional bound.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Sleep between readiness checks (default: 10s).
    pub interval: Duration,
    /// Maximum number of metadata fetches before giving up.
    /// `None` polls forever (default).
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: None,
        }
    }
}

impl PollConfig {
    /// Set the polling interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Bound the number of readiness checks.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }
}

/// Errors from the readiness poll
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("search index not built after {attempts} checks")]
    Deadline { attempts: u32 },

    #[error(transparent)]
    BigQuery(#[from] BigQueryError),
}

/// Suspension point between readiness checks.
///
/// Injected so tests can run N polling rounds without real delay.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, period: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, period: Duration) {
        tokio::time::sleep(period).await;
    }
}

/// Block until `table` reports a built search index.
///
/// Fetches the table's metadata; returns the number of fetches performed as
/// soon as one reports a built index (no sleep after the final fetch).
/// Otherwise sleeps `config.interval` and retries. For N "not built"
/// responses followed by one "built", this performs exactly N+1 fetches and
/// N sleeps.
pub async fn wait_for_index<C, S>(
    client: &C,
    table: &TableRef,
    config: &PollConfig,
    sleeper: &S,
) -> Result<u32, PollError>
where
    C: BigQueryClient + ?Sized,
    S: Sleeper + ?Sized,
{
    let mut attempts: u32 = 0;
    loop {
        let metadata = client.table_metadata(table).await?;
        attempts += 1;
        if metadata.has_built_index() {
            tracing::debug!("search index on {} built after {} checks", table, attempts);
            return Ok(attempts);
        }
        if let Some(max) = config.max_attempts {
            if attempts >= max {
                return Err(PollError::Deadline { attempts });
            }
        }
        tracing::debug!(
            "search index on {} not built yet (check {}), sleeping {:?}",
            table,
            attempts,
            config.interval
        );
        sleeper.sleep(config.interval).await;
    }
}
