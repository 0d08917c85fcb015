use std::io;

use crate::persist::PersistError;

/// Startup failure: one or more external tools could not be resolved.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("required tools not found on PATH: {}", .missing.join(", "))]
    Missing { missing: Vec<String> },
}

/// Why a single task did not produce an output file.
///
/// These never escape a task; they are rendered into the task's failure message.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("fetch tool failed: {0}")]
    FetchFailed(String),
    #[error("source file not found")]
    SourceMissing,
    #[error("transcode failed: {0}")]
    TranscodeFailed(String),
    #[error("could not launch {tool}: {message}")]
    Launch { tool: String, message: String },
    #[error("io error: {0}")]
    Io(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<io::Error> for TaskError {
    fn from(err: io::Error) -> Self {
        TaskError::Io(err.to_string())
    }
}

/// Run-level failure; aborts the run instead of being folded into a task result.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Tools(#[from] ToolError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
}
