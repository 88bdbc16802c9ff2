// Error types for the benchmark harness

use thiserror::Error;

/// Result type alias for benchmark operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or driving the pipeline.
///
/// Every variant is fatal: the harness has no recoverable category, no retry,
/// and never persists a partial summary.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed external input (toolkit asset, stage wiring)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A pipeline stage failed during event processing
    #[error("pipeline execution failed: {0}")]
    Execution(String),

    /// Timing report absent, unparsable, or missing an expected column
    #[error("timing report error: {0}")]
    Report(String),

    /// A stage ran but left no timing entry, or did not run at all
    #[error("stage {0:?} has no entry in the timing report")]
    MissingStage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create an execution error
    pub fn execution(msg: impl Into<String>) -> Self {
        Error::Execution(msg.into())
    }

    /// Create a report error
    pub fn report(msg: impl Into<String>) -> Self {
        Error::Report(msg.into())
    }

    /// Create a missing-stage error
    pub fn missing_stage(identifier: impl Into<String>) -> Self {
        Error::MissingStage(identifier.into())
    }
}
