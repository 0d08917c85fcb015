use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::ToolError;

/// Tool diagnostics are cut to this many characters before they reach a task result.
pub const MAX_DIAGNOSTIC_CHARS: usize = 300;

const FALLBACK_CPUS: usize = 4;

/// Executable names (or paths) of the external capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolNames {
    pub fetch: String,
    pub transcode: String,
    pub probe: String,
}

impl Default for ToolNames {
    fn default() -> Self {
        Self {
            fetch: "yt-dlp".to_string(),
            transcode: "ffmpeg".to_string(),
            probe: "ffprobe".to_string(),
        }
    }
}

/// Resolved locations of the external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub fetch: PathBuf,
    pub transcode: PathBuf,
    pub probe: PathBuf,
}

impl ToolPaths {
    /// Resolve every tool with `which`, reporting all missing ones at once.
    pub fn discover(names: &ToolNames) -> Result<Self, ToolError> {
        let mut missing = Vec::new();
        let mut resolve = |name: &str| match which::which(name) {
            Ok(path) => Some(path),
            Err(_) => {
                missing.push(name.to_string());
                None
            }
        };
        let fetch = resolve(&names.fetch);
        let transcode = resolve(&names.transcode);
        let probe = resolve(&names.probe);

        match (fetch, transcode, probe) {
            (Some(fetch), Some(transcode), Some(probe)) => Ok(Self {
                fetch,
                transcode,
                probe,
            }),
            _ => Err(ToolError::Missing { missing }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Run a tool to completion and capture its output. Invalid UTF-8 is replaced.
///
/// There is no timeout: a hanging tool keeps its worker busy.
pub async fn run_tool<I, S>(program: &Path, args: I) -> std::io::Result<ToolOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await?;
    Ok(ToolOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Trim tool output and keep at most `max_chars` characters.
pub fn truncate_diagnostic(text: &str, max_chars: usize) -> String {
    text.trim().chars().take(max_chars).collect()
}

pub fn available_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_CPUS)
}
