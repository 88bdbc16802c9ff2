// Benchmark loop
//
// Strictly sequential: one pipeline object, one run at a time. Each run must
// complete (and its timing report become readable) before extraction starts,
// and extraction must finish before the next run begins. Any failure aborts
// the whole benchmark; no partial summary is ever produced, because the
// caller only receives a TimingSummary when every run succeeded.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::report::TimingReport;
use crate::summary::{extract_sample, TimingSummary};
use tracing::info;

/// File name of the per-run report the toolkit writes into the output
/// directory
pub const TIMING_REPORT_FILE: &str = "timing.tsv";

/// Execute the pipeline once, blocking, then load the timing report it wrote
pub fn run_once(pipeline: &mut dyn Pipeline) -> Result<TimingReport> {
    pipeline.execute()?;
    let path = pipeline.output_dir().join(TIMING_REPORT_FILE);
    TimingReport::from_tsv_file(&path)
}

/// Run the full benchmark: `config.runs` sequential executions, extracting
/// one sample per run. Returns the complete summary only after every run has
/// succeeded.
pub fn run_benchmark(
    pipeline: &mut dyn Pipeline,
    config: &PipelineConfig,
    build_id: &str,
) -> Result<TimingSummary> {
    let mut summary = TimingSummary::new(build_id);
    for run in 1..=config.runs {
        info!(run, runs = config.runs, events = config.events, "starting run");
        let report = run_once(pipeline)?;
        let sample = extract_sample(&report, config)?;
        info!(run, times = ?sample.entries(), "finished run");
        summary.push(sample);
    }
    Ok(summary)
}
