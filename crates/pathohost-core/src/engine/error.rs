use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to launch {tool} ('{path}'): {source}", path = path.display())]
    ToolUnavailable {
        tool: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: String,
        stderr: String,
    },

    #[error("{tool} did not produce the expected output file '{path}'", path = path.display())]
    MissingOutput { tool: &'static str, path: PathBuf },

    #[error("I/O error on '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "A docking run is already in progress (lock file '{lock}'); if no run is active, delete the lock file and retry",
        lock = lock.display()
    )]
    RunInProgress { lock: PathBuf },

    #[error("Failed to write CSV '{path}': {source}", path = path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A pose that could not be converted to the display format.
///
/// Carries the rank of the first failing pose; any failure invalidates the
/// whole batch.
#[derive(Debug, Error)]
#[error("Failed to convert pose {rank} ({failed} of {total} pose(s) failed): {source}")]
pub struct ConversionError {
    pub rank: usize,
    pub failed: usize,
    pub total: usize,
    #[source]
    pub source: Box<EngineError>,
}
