#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use boombox_core::TaskResult;
use boombox_engine::{
    AudioInfo, AudioInspector, MediaFetcher, ProgressSink, TaskError, TranscodeProfile,
    Transcoder, Toolset,
};

pub const FETCHED_BYTES: &[u8] = b"fetched audio";
pub const ENCODED_BYTES: &[u8] = b"encoded audio";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// Writes `<base>.<extension>` unless the reference asks for a failure:
/// `broken` fails like the real tool, `vanish` succeeds without leaving a file.
pub struct FakeFetcher {
    pub extension: String,
    pub calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MediaFetcher for FakeFetcher {
    async fn fetch(&self, source_ref: &str, dir: &Path, base: &str) -> Result<(), TaskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if source_ref.contains("broken") {
            return Err(TaskError::FetchFailed("ERROR: HTTP Error 404".to_string()));
        }
        if source_ref.contains("vanish") {
            return Ok(());
        }
        fs::write(dir.join(format!("{base}.{}", self.extension)), FETCHED_BYTES)?;
        Ok(())
    }
}

pub struct FakeInspector {
    pub info: AudioInfo,
}

#[async_trait]
impl AudioInspector for FakeInspector {
    async fn inspect(&self, _path: &Path) -> AudioInfo {
        self.info.clone()
    }
}

#[derive(Default)]
pub struct FakeTranscoder {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl FakeTranscoder {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn transcode(
        &self,
        source: &Path,
        destination: &Path,
        _profile: &TranscodeProfile,
    ) -> Result<(), TaskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(source.exists(), "source must exist while transcoding");
        if self.fail {
            return Err(TaskError::TranscodeFailed(
                "Invalid data found when processing input".to_string(),
            ));
        }
        fs::write(destination, ENCODED_BYTES)?;
        Ok(())
    }
}

pub struct Fakes {
    pub fetcher: Arc<FakeFetcher>,
    pub inspector: Arc<FakeInspector>,
    pub transcoder: Arc<FakeTranscoder>,
}

impl Fakes {
    pub fn new(extension: &str, info: AudioInfo, transcoder: FakeTranscoder) -> Self {
        Self {
            fetcher: Arc::new(FakeFetcher::new(extension)),
            inspector: Arc::new(FakeInspector { info }),
            transcoder: Arc::new(transcoder),
        }
    }

    pub fn toolset(&self) -> Toolset {
        Toolset {
            fetcher: self.fetcher.clone(),
            inspector: self.inspector.clone(),
            transcoder: self.transcoder.clone(),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub emitted: Mutex<Vec<TaskResult>>,
    pub skipped: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn results(&self) -> Vec<TaskResult> {
        self.emitted.lock().unwrap().clone()
    }

    pub fn skipped_lines(&self) -> Vec<String> {
        self.skipped.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, result: &TaskResult) {
        self.emitted.lock().unwrap().push(result.clone());
    }

    fn skipped(&self, line: &str) {
        self.skipped.lock().unwrap().push(line.to_string());
    }
}

pub fn dir_is_empty(dir: &Path) -> bool {
    fs::read_dir(dir).unwrap().next().is_none()
}
