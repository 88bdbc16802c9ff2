// Sequencer invocation
//
// The stage plan is rendered to sequencer arguments exactly once; the same
// child-process invocation is then repeated for every run. The sequencer
// persists its random stream in the output directory between invocations
// (`--continue-random-stream`), so consecutive runs draw fresh events from a
// continuing stream instead of replaying the first run.

use crate::context::ToolkitContext;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use trackbench_core::{Error, Pipeline, PipelineConfig, Result, StagePlan};
use tracing::debug;

/// Pipeline implementation backed by the toolkit's sequencer executable
pub struct SequencerPipeline {
    bin: PathBuf,
    args: Vec<String>,
    output_dir: PathBuf,
}

/// Construct the full processing pipeline for a configuration.
///
/// Builds and validates the stage plan, creates the output directory, and
/// renders the invocation. Fails fatally if the plan does not wire or the
/// output directory cannot be created; missing toolkit assets have already
/// been rejected by [`ToolkitContext::resolve`].
pub fn build_pipeline(
    context: &ToolkitContext,
    config: &PipelineConfig,
) -> Result<SequencerPipeline> {
    let plan = StagePlan::build(config)?;
    fs::create_dir_all(&config.output_dir)?;

    let args = render_args(context, config, &plan);
    debug!(bin = %context.sequencer_bin().display(), args = args.len(), "pipeline built");

    Ok(SequencerPipeline {
        bin: context.sequencer_bin().to_path_buf(),
        args,
        output_dir: config.output_dir.clone(),
    })
}

impl SequencerPipeline {
    /// Rendered sequencer arguments, in invocation order
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Pipeline for SequencerPipeline {
    fn execute(&mut self) -> Result<()> {
        let output = Command::new(&self.bin)
            .args(&self.args)
            .output()
            .map_err(|e| {
                Error::execution(format!(
                    "cannot spawn {}: {}",
                    self.bin.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::execution(format!(
                "sequencer exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

fn render_args(
    context: &ToolkitContext,
    config: &PipelineConfig,
    plan: &StagePlan,
) -> Vec<String> {
    let mut args = vec![
        "--events".to_string(),
        config.events.to_string(),
        "--seed".to_string(),
        config.seed.to_string(),
        // One run at a time, deterministically ordered
        "--threads".to_string(),
        "1".to_string(),
        "--no-track-fpes".to_string(),
        "--continue-random-stream".to_string(),
        "--output-dir".to_string(),
        config.output_dir.display().to_string(),
        "--geometry-dir".to_string(),
        context.geometry_dir().display().to_string(),
        "--material-map".to_string(),
        context.material_map().display().to_string(),
        "--digi-config".to_string(),
        context.digi_config().display().to_string(),
        "--seeding-config".to_string(),
        context.seeding_config().display().to_string(),
    ];

    for stage in plan.stages() {
        args.push("--stage".to_string());
        args.push(stage.identifier.clone());
        for (key, value) in &stage.args {
            args.push("--stage-arg".to_string());
            args.push(format!("{}:{}={}", stage.identifier, key, value));
        }
    }

    args
}
