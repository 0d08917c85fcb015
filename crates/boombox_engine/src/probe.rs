use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use engine_logging::engine_debug;

use crate::tools::run_tool;

/// Codec and bit rate of the first audio stream.
///
/// An empty codec and a zero bit rate mean "unknown".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AudioInfo {
    pub codec: String,
    pub bit_rate_bps: i64,
}

impl AudioInfo {
    pub fn new(codec: impl Into<String>, bit_rate_bps: i64) -> Self {
        Self {
            codec: codec.into(),
            bit_rate_bps,
        }
    }
}

/// Reads stream properties of a fetched file. Inspection never fails; unknown
/// values simply disqualify the file from pass-through.
#[async_trait]
pub trait AudioInspector: Send + Sync {
    async fn inspect(&self, path: &Path) -> AudioInfo;
}

#[derive(Debug, Clone)]
pub struct FfprobeInspector {
    binary: PathBuf,
}

impl FfprobeInspector {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Value of one `stream=<entry>` field of `a:0`, or `None` if the probe failed.
    async fn query(&self, path: &Path, entry: &str) -> Option<String> {
        let show = format!("stream={entry}");
        let args = [
            OsStr::new("-v"),
            OsStr::new("error"),
            OsStr::new("-select_streams"),
            OsStr::new("a:0"),
            OsStr::new("-show_entries"),
            OsStr::new(&show),
            OsStr::new("-of"),
            OsStr::new("default=nw=1:nk=1"),
            path.as_os_str(),
        ];
        match run_tool(&self.binary, args).await {
            Ok(output) if output.success => Some(output.stdout),
            Ok(output) => {
                engine_debug!("probe {} failed for {:?}: {}", entry, path, output.stderr.trim());
                None
            }
            Err(err) => {
                engine_debug!("probe {} could not run for {:?}: {}", entry, path, err);
                None
            }
        }
    }
}

#[async_trait]
impl AudioInspector for FfprobeInspector {
    async fn inspect(&self, path: &Path) -> AudioInfo {
        let codec = self
            .query(path, "codec_name")
            .await
            .map(|out| parse_codec(&out))
            .unwrap_or_default();
        let bit_rate_bps = self
            .query(path, "bit_rate")
            .await
            .map(|out| parse_bit_rate(&out))
            .unwrap_or(0);
        AudioInfo {
            codec,
            bit_rate_bps,
        }
    }
}

fn parse_codec(stdout: &str) -> String {
    stdout.trim().to_string()
}

fn parse_bit_rate(stdout: &str) -> i64 {
    stdout
        .lines()
        .next()
        .and_then(|line| line.trim().parse().ok())
        .unwrap_or(0)
}
