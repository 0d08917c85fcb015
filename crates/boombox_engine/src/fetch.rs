use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use engine_logging::engine_debug;

use crate::tools::{run_tool, truncate_diagnostic, MAX_DIAGNOSTIC_CHARS};
use crate::TaskError;

/// Acquires one media source into a local directory.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Fetch the best available audio of `source_ref` into `dir` as `<base>.<ext>`.
    ///
    /// The extension is chosen by the fetcher.
    async fn fetch(&self, source_ref: &str, dir: &Path, base: &str) -> Result<(), TaskError>;
}

/// Fetcher backed by the `yt-dlp` command line tool.
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    binary: PathBuf,
}

impl YtDlpFetcher {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch(&self, source_ref: &str, dir: &Path, base: &str) -> Result<(), TaskError> {
        let template = dir.join(format!("{base}.%(ext)s"));
        engine_debug!("fetching {} into {:?}", source_ref, template);

        let args = [
            OsStr::new("-f"),
            OsStr::new("bestaudio"),
            OsStr::new(source_ref),
            OsStr::new("-o"),
            template.as_os_str(),
        ];
        let output = run_tool(&self.binary, args)
            .await
            .map_err(|err| TaskError::Launch {
                tool: self.binary.display().to_string(),
                message: err.to_string(),
            })?;
        if !output.success {
            return Err(TaskError::FetchFailed(truncate_diagnostic(
                &output.stderr,
                MAX_DIAGNOSTIC_CHARS,
            )));
        }
        Ok(())
    }
}

/// Find the file a fetcher produced for `base`, i.e. the first `<base>.*` entry in `dir`.
pub fn locate_fetched(dir: &Path, base: &str) -> io::Result<Option<PathBuf>> {
    let prefix = format!("{base}.");
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with(&prefix) {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}
