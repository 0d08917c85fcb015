use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use engine_logging::engine_debug;

use crate::tools::{run_tool, truncate_diagnostic, MAX_DIAGNOSTIC_CHARS};
use crate::{AudioInfo, TaskError};

const TARGET_CODEC: &str = "mp3";
const TARGET_EXTENSION: &str = "mp3";

/// Target audio format and the band of source bit rates accepted without re-encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeProfile {
    pub sample_rate_hz: u32,
    pub channels: u8,
    /// Constant bit rate passed to the encoder, e.g. `192k`.
    pub bitrate: String,
    pub passthrough_min_bps: i64,
    pub passthrough_max_bps: i64,
}

impl Default for TranscodeProfile {
    fn default() -> Self {
        Self {
            sample_rate_hz: 48_000,
            channels: 2,
            bitrate: "192k".to_string(),
            passthrough_min_bps: 192_000,
            passthrough_max_bps: 192_500,
        }
    }
}

impl TranscodeProfile {
    /// A fetched file is kept as-is only when it already is an mp3 in the target band.
    pub fn allows_passthrough(&self, source: &Path, info: &AudioInfo) -> bool {
        let is_mp3_file = source
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(TARGET_EXTENSION));
        is_mp3_file
            && info.codec.eq_ignore_ascii_case(TARGET_CODEC)
            && (self.passthrough_min_bps..=self.passthrough_max_bps).contains(&info.bit_rate_bps)
    }
}

#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Encode `source` into `destination` according to `profile`, overwriting it.
    async fn transcode(
        &self,
        source: &Path,
        destination: &Path,
        profile: &TranscodeProfile,
    ) -> Result<(), TaskError>;
}

#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        source: &Path,
        destination: &Path,
        profile: &TranscodeProfile,
    ) -> Result<(), TaskError> {
        engine_debug!("transcoding {:?} -> {:?}", source, destination);
        let sample_rate = profile.sample_rate_hz.to_string();
        let channels = profile.channels.to_string();
        let args = [
            OsStr::new("-y"),
            OsStr::new("-i"),
            source.as_os_str(),
            OsStr::new("-ar"),
            OsStr::new(&sample_rate),
            OsStr::new("-ac"),
            OsStr::new(&channels),
            OsStr::new("-b:a"),
            OsStr::new(&profile.bitrate),
            destination.as_os_str(),
        ];
        let output = run_tool(&self.binary, args)
            .await
            .map_err(|err| TaskError::Launch {
                tool: self.binary.display().to_string(),
                message: err.to_string(),
            })?;
        if !output.success {
            return Err(TaskError::TranscodeFailed(truncate_diagnostic(
                &output.stderr,
                MAX_DIAGNOSTIC_CHARS,
            )));
        }
        Ok(())
    }
}
