//! Prepare/Run/Cleanup lifecycle for the index-search benchmark
//!
//! Translates the harness lifecycle into three remote actions: install the
//! cloud SDK and push the workload, invoke it and parse its JSON line, and
//! best-effort delete the dataset. No retries; cleanup failures are ignored.

use std::path::PathBuf;

use anyhow::Context;

use super::remote::RemoteHost;
use super::spec::HarnessSpec;
use crate::bench::{Sample, WorkloadReport};

/// Metric name the benchmark reports under.
pub const METRIC: &str = "BigQuery index search";

/// Where the workload lands on the benchmark host.
const REMOTE_WORKLOAD_PATH: &str = "/tmp/bqbench";

/// The harness-side adapter for one benchmark run.
pub struct IndexSearchBenchmark<H: RemoteHost> {
    host: H,
    spec: HarnessSpec,
    workload_binary: PathBuf,
}

impl<H: RemoteHost> IndexSearchBenchmark<H> {
    /// Adapter pushing `workload_binary` to the given host.
    pub fn new(host: H, spec: HarnessSpec, workload_binary: impl Into<PathBuf>) -> Self {
        Self {
            host,
            spec,
            workload_binary: workload_binary.into(),
        }
    }

    /// Install prerequisites and push the workload onto the host.
    pub async fn prepare(&self) -> anyhow::Result<()> {
        self.host
            .install("google-cloud-sdk")
            .await
            .context("installing cloud SDK")?;
        self.host
            .command(&format!(
                "gcloud auth application-default login --scopes={}",
                self.spec.scopes.join(",")
            ))
            .await
            .context("authenticating on the benchmark host")?;
        self.host
            .push_file(&self.workload_binary, REMOTE_WORKLOAD_PATH)
            .await
            .context("pushing workload")?;
        self.host
            .command(&format!("chmod 755 {}", REMOTE_WORKLOAD_PATH))
            .await
            .context("marking workload executable")?;
        Ok(())
    }

    /// Invoke the workload remotely and parse its JSON line into a sample.
    pub async fn run(&self, project_id: &str, dataset_id: &str) -> anyhow::Result<Sample> {
        let cmd = format!(
            "{} run --project-id {} --dataset-id {}",
            REMOTE_WORKLOAD_PATH, project_id, dataset_id
        );
        tracing::info!("{}", cmd);
        let output = self.host.command(&cmd).await?;
        tracing::info!("{}", output.stdout);
        tracing::info!("{}", output.stderr);

        let line = output
            .stdout
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .context("workload produced no output")?;
        let report: WorkloadReport =
            serde_json::from_str(line.trim()).context("workload output was not a report")?;

        Ok(Sample::seconds(METRIC, report.execution_time))
    }

    /// Best-effort dataset removal. Never fails and never touches an
    /// already-produced sample.
    pub async fn cleanup(&self, project_id: &str, dataset_id: &str) {
        self.host
            .command_ignore_failure(&format!(
                "bq rm --project_id={} -r -f -d {}",
                project_id, dataset_id
            ))
            .await;
    }
}
