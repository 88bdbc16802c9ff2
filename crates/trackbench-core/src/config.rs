// Benchmark configuration
//
// PipelineConfig is chosen once from the command line and never mutated.
// The two mode flags are tagged variants selected at configuration time, so
// the set of active stage identifiers is fixed before the loop begins.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Timing-report identifier of the combinatorial track finder
pub const TRACK_FINDING_IDENTIFIER: &str = "Algorithm:TrackFindingAlgorithm";

/// Summary column name for the track-finding stage
pub const TRACK_FINDING_KEY: &str = "ckf";

/// Event generation variant. Exactly one is active per benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorMode {
    /// Single-particle gun, 50 vertices of 4 muons per event
    ParticleGun,
    /// ttbar hard process with 200 pileup collisions per event
    Pythia8Ttbar,
}

/// Detector simulation variant. Exactly one is active per benchmark, and it
/// decides which simulation identifier is read back from the timing report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationEngine {
    /// Fast track simulation
    Fatras,
    /// Full Geant4 simulation
    Geant4,
}

impl SimulationEngine {
    /// Timing-report identifier of this engine's simulation stage
    pub fn identifier(&self) -> &'static str {
        match self {
            SimulationEngine::Fatras => "Algorithm:FatrasSimulation",
            SimulationEngine::Geant4 => "Algorithm:Geant4Simulation",
        }
    }

    /// Summary column name for this engine's simulation stage
    pub fn sample_key(&self) -> &'static str {
        match self {
            SimulationEngine::Fatras => "fatras",
            SimulationEngine::Geant4 => "geant4",
        }
    }
}

/// Immutable benchmark parameters, fixed before the first run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Events processed per run
    pub events: u32,

    /// Number of benchmark runs
    pub runs: u32,

    /// Random seed handed to the toolkit's number generator
    pub seed: u64,

    /// Directory receiving per-run reports and the final summary
    pub output_dir: PathBuf,

    /// Active event generation variant
    pub generator: GeneratorMode,

    /// Active detector simulation variant
    pub simulation: SimulationEngine,
}

impl PipelineConfig {
    /// Create a configuration with the per-mode default event and run counts.
    ///
    /// ttbar events are far heavier than the particle gun, so that mode drops
    /// to 3 events over 10 runs against the gun's 20 events over 50 runs.
    pub fn new(
        generator: GeneratorMode,
        simulation: SimulationEngine,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        let (events, runs) = match generator {
            GeneratorMode::ParticleGun => (20, 50),
            GeneratorMode::Pythia8Ttbar => (3, 10),
        };
        Self {
            events,
            runs,
            seed: 42,
            output_dir: output_dir.into(),
            generator,
            simulation,
        }
    }

    /// Override the per-run event count
    pub fn with_events(mut self, events: u32) -> Self {
        self.events = events;
        self
    }

    /// Override the number of runs
    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs = runs;
        self
    }

    /// Override the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Timing-report identifier of the active simulation stage
    pub fn simulation_identifier(&self) -> &'static str {
        self.simulation.identifier()
    }

    /// Summary column name of the active simulation stage
    pub fn simulation_key(&self) -> &'static str {
        self.simulation.sample_key()
    }
}
