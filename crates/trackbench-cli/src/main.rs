// Trackbench CLI
//
// Design Decision: Use clap derive for ergonomic argument parsing.
// Design Decision: The two mode flags are resolved to tagged variants here,
// once, before anything is built; nothing downstream branches on booleans.
// Design Decision: Any failure exits non-zero with no summary file - the
// summary is only persisted after every run has succeeded.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use trackbench_core::{run_benchmark, GeneratorMode, PipelineConfig, SimulationEngine};
use trackbench_toolkit::{build_pipeline, ToolkitContext};

#[derive(Parser)]
#[command(name = "trackbench")]
#[command(about = "Full-chain tracking performance benchmark driver")]
#[command(version)]
struct Cli {
    /// Use ttbar events with pileup instead of the single-particle gun
    /// (heavier; defaults drop to 3 events over 10 runs)
    #[arg(long)]
    ttbar: bool,

    /// Use the Geant4 simulation engine instead of Fatras
    #[arg(long)]
    geant4: bool,

    /// Directory receiving per-run reports and the final summary
    #[arg(long, default_value = "perf-out")]
    output_dir: PathBuf,

    /// Tracking toolkit installation directory
    #[arg(long, env = "TRACKBENCH_TOOLKIT_DIR")]
    toolkit_dir: PathBuf,

    /// Override the per-run event count
    #[arg(long)]
    events: Option<u32>,

    /// Override the number of benchmark runs
    #[arg(long)]
    runs: Option<u32>,

    /// Random seed handed to the toolkit
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn into_config(self) -> (PipelineConfig, PathBuf) {
        let generator = if self.ttbar {
            GeneratorMode::Pythia8Ttbar
        } else {
            GeneratorMode::ParticleGun
        };
        let simulation = if self.geant4 {
            SimulationEngine::Geant4
        } else {
            SimulationEngine::Fatras
        };

        let mut config = PipelineConfig::new(generator, simulation, self.output_dir);
        if let Some(events) = self.events {
            config = config.with_events(events);
        }
        if let Some(runs) = self.runs {
            config = config.with_runs(runs);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        (config, self.toolkit_dir)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("trackbench=info")),
        )
        .init();

    let (config, toolkit_dir) = Cli::parse().into_config();

    let context = ToolkitContext::resolve(&toolkit_dir)
        .context("failed to resolve toolkit installation")?;
    tracing::info!(
        build_id = %context.build_id(),
        events = config.events,
        runs = config.runs,
        generator = ?config.generator,
        simulation = ?config.simulation,
        "benchmark configured"
    );

    // Built once, reused for every run; geometry and material loading is
    // paid a single time
    let mut pipeline =
        build_pipeline(&context, &config).context("failed to build pipeline")?;

    let summary = run_benchmark(&mut pipeline, &config, context.build_id())?;
    let path = summary
        .persist(&config.output_dir)
        .context("failed to persist summary")?;

    tracing::info!(path = %path.display(), runs = summary.len(), "benchmark complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ttbar_flag_switches_mode_and_defaults() {
        let cli = Cli::parse_from(["trackbench", "--ttbar", "--toolkit-dir", "/opt/tk"]);
        let (config, toolkit_dir) = cli.into_config();
        assert_eq!(config.generator, GeneratorMode::Pythia8Ttbar);
        assert_eq!(config.simulation, SimulationEngine::Fatras);
        assert_eq!(config.events, 3);
        assert_eq!(config.runs, 10);
        assert_eq!(toolkit_dir, PathBuf::from("/opt/tk"));
    }

    #[test]
    fn explicit_overrides_beat_mode_defaults() {
        let cli = Cli::parse_from([
            "trackbench",
            "--geant4",
            "--toolkit-dir",
            "/opt/tk",
            "--events",
            "2",
            "--runs",
            "4",
            "--seed",
            "7",
        ]);
        let (config, _) = cli.into_config();
        assert_eq!(config.simulation, SimulationEngine::Geant4);
        assert_eq!(config.events, 2);
        assert_eq!(config.runs, 4);
        assert_eq!(config.seed, 7);
        assert_eq!(config.output_dir, PathBuf::from("perf-out"));
    }
}
