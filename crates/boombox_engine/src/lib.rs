//! Boombox engine: external tools, the fetch-and-normalize pipeline and run orchestration.
mod aggregate;
mod engine;
mod fetch;
mod list_file;
mod persist;
mod probe;
mod scheduler;
mod task;
mod tools;
mod transcode;
mod types;

pub use aggregate::{aggregate, write_manifest};
pub use engine::{EngineConfig, EngineHandle, RunOutcome, RunReport, Toolset};
pub use fetch::{locate_fetched, MediaFetcher, YtDlpFetcher};
pub use list_file::WorkListFile;
pub use persist::{
    append_text_line, ensure_output_dir, read_text_lines, AtomicFileWriter, PersistError,
};
pub use probe::{AudioInfo, AudioInspector, FfprobeInspector};
pub use scheduler::{run_all, ConsoleProgressSink, ItemProcessor, ProgressSink};
pub use task::{move_file, resolve_destination, timestamp_suffix, Normalizer, NormalizerSettings};
pub use tools::{
    available_cpus, run_tool, truncate_diagnostic, ToolNames, ToolOutput, ToolPaths,
    MAX_DIAGNOSTIC_CHARS,
};
pub use transcode::{FfmpegTranscoder, TranscodeProfile, Transcoder};
pub use types::{EngineError, TaskError, ToolError};
