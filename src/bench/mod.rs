//! Benchmark core: readiness polling, timing, and the workload
//!
//! The polling protocol in [`poller`] is the heart of the benchmark; the
//! rest sequences engine calls around it and reports one sample.

pub mod poller;
pub mod sample;
pub mod timer;
pub mod workload;

pub use poller::{wait_for_index, PollConfig, PollError, Sleeper, TokioSleeper};
pub use sample::{Sample, UNIT_SECONDS};
pub use timer::time_query;
pub use workload::{run, RunParams, WorkloadError, WorkloadReport};
