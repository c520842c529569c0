//! Harness adapter: lifecycle glue between the outer harness and the workload
//!
//! Thin by design. Provisioning and remote execution stay behind
//! [`RemoteHost`]; this module only sequences prepare, run, and cleanup.

pub mod adapter;
pub mod remote;
pub mod spec;

pub use adapter::{IndexSearchBenchmark, METRIC};
pub use remote::{CommandOutput, RemoteError, RemoteHost, SshHost};
pub use spec::{HarnessSpec, VmSpec};
