use std::path::{Path, PathBuf};

use boombox_core::{manifest_lines, RunSummary, TaskResult};
use engine_logging::engine_info;

use crate::list_file::WorkListFile;
use crate::persist::{AtomicFileWriter, PersistError};

/// Replace the manifest at `path` with one line per delivered result.
pub fn write_manifest(path: &Path, results: &[TaskResult]) -> Result<PathBuf, PersistError> {
    let lines = manifest_lines(results);
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| PersistError::OutputDir(format!("invalid manifest path {path:?}")))?;
    let written = AtomicFileWriter::for_path(path).write_lines(filename, &lines)?;
    engine_info!("Wrote {} manifest entries to {:?}", lines.len(), written);
    Ok(written)
}

/// Persist the manifest, mark the work list completed and count outcomes.
///
/// Only a manifest failure is an error; marking the list is best effort.
pub fn aggregate(
    results: &[TaskResult],
    manifest_path: &Path,
    work_list: &WorkListFile,
) -> Result<(RunSummary, bool), PersistError> {
    write_manifest(manifest_path, results)?;
    let marked = work_list.mark_completed();
    Ok((RunSummary::from_results(results), marked))
}
