// Core abstractions for the full-chain tracking performance benchmark
//
// Decision: Keep the benchmark loop toolkit-agnostic via the Pipeline trait
// Decision: Domain types (config, report, sample, summary) are defined here for
//           shared use by the toolkit wrapper and the CLI
// Decision: Strictly sequential execution - the loop owns one mutable pipeline
//           and never runs two executions concurrently

pub mod config;
pub mod error;
pub mod harness;
pub mod pipeline;
pub mod report;
pub mod summary;

pub use config::{GeneratorMode, PipelineConfig, SimulationEngine};
pub use error::{Error, Result};
pub use harness::{run_benchmark, run_once, TIMING_REPORT_FILE};
pub use pipeline::{Pipeline, Stage, StagePlan};
pub use report::TimingReport;
pub use summary::{extract_sample, TimingSample, TimingSummary};
