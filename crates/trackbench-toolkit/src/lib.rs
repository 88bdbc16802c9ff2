// Tracking toolkit wrapper
//
// This crate provides the concrete Pipeline implementation over the external
// tracking toolkit. It implements the Pipeline trait from trackbench-core,
// enabling the benchmark loop to execute the full chain without knowing how
// the toolkit is invoked.
//
// The toolkit is reached through its `sequencer` executable: the stage plan
// is rendered to command-line arguments once, and the same invocation is
// repeated for every run.

mod context;
mod sequencer;

pub use context::ToolkitContext;
pub use sequencer::{build_pipeline, SequencerPipeline};

// Re-export core types for convenience
pub use trackbench_core::Pipeline;
