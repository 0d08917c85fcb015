use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use boombox_core::{disambiguated_name, sanitize_name, DeliveryTarget, TaskResult, WorkItem};
use engine_logging::{engine_debug, engine_info, engine_warn};
use tempfile::TempDir;
use uuid::Uuid;

use crate::fetch::{locate_fetched, MediaFetcher};
use crate::probe::AudioInspector;
use crate::scheduler::ItemProcessor;
use crate::transcode::{TranscodeProfile, Transcoder};
use crate::TaskError;

const SCRATCH_PREFIX: &str = "boombox_";
const OUTPUT_EXTENSION: &str = "mp3";

#[derive(Debug, Clone)]
pub struct NormalizerSettings {
    pub output_dir: PathBuf,
    /// Parent of the per-task scratch directories; the system temp dir when `None`.
    pub temp_root: Option<PathBuf>,
    pub delivery: DeliveryTarget,
    pub profile: TranscodeProfile,
}

/// Turns one work item into one normalized mp3 in the output directory.
pub struct Normalizer {
    settings: NormalizerSettings,
    fetcher: Arc<dyn MediaFetcher>,
    inspector: Arc<dyn AudioInspector>,
    transcoder: Arc<dyn Transcoder>,
}

impl Normalizer {
    pub fn new(
        settings: NormalizerSettings,
        fetcher: Arc<dyn MediaFetcher>,
        inspector: Arc<dyn AudioInspector>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Self {
        Self {
            settings,
            fetcher,
            inspector,
            transcoder,
        }
    }

    pub fn settings(&self) -> &NormalizerSettings {
        &self.settings
    }

    /// Run the whole pipeline for `item`. Every failure ends up in the returned result.
    pub async fn normalize(&self, item: WorkItem) -> TaskResult {
        let name = sanitize_name(&item.display_name);
        match self.try_process(&item, &name).await {
            Ok(result) => result,
            Err(err) => {
                engine_debug!("{} failed: {}", item.source_ref, err);
                TaskResult::failed(name, err.to_string())
            }
        }
    }

    async fn try_process(&self, item: &WorkItem, name: &str) -> Result<TaskResult, TaskError> {
        // Removed when dropped, on every exit path.
        let scratch = self.scratch_dir()?;
        let base = Uuid::new_v4().simple().to_string();

        self.fetcher
            .fetch(&item.source_ref, scratch.path(), &base)
            .await?;
        let source = locate_fetched(scratch.path(), &base)?.ok_or(TaskError::SourceMissing)?;

        let info = self.inspector.inspect(&source).await;
        engine_debug!(
            "{:?}: codec={:?} bit_rate={}",
            source,
            info.codec,
            info.bit_rate_bps
        );

        let (final_name, destination) =
            resolve_destination(&self.settings.output_dir, name, timestamp_suffix);

        if self.settings.profile.allows_passthrough(&source, &info) {
            engine_info!("{}: already in target format, moving as-is", final_name);
            move_file(&source, &destination).await?;
        } else {
            let transcoded = self
                .transcoder
                .transcode(&source, &destination, &self.settings.profile)
                .await;
            if let Err(err) = tokio::fs::remove_file(&source).await {
                engine_warn!("Could not remove fetched source {:?}: {}", source, err);
            }
            transcoded?;
        }

        let delivery_url = self.settings.delivery.url_for(&final_name);
        Ok(TaskResult::delivered(final_name, delivery_url, destination))
    }

    fn scratch_dir(&self) -> Result<TempDir, TaskError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let dir = match &self.settings.temp_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        Ok(dir)
    }
}

#[async_trait]
impl ItemProcessor for Normalizer {
    async fn process(&self, item: WorkItem) -> TaskResult {
        self.normalize(item).await
    }
}

/// Destination `<output_dir>/<name>.mp3`, or a timestamped name when that file exists.
///
/// Checked without locking: two tasks racing for the same name may still collide.
pub fn resolve_destination(
    output_dir: &Path,
    name: &str,
    stamp: impl FnOnce() -> String,
) -> (String, PathBuf) {
    let destination = output_path(output_dir, name);
    if !destination.exists() {
        return (name.to_string(), destination);
    }
    let unique = disambiguated_name(name, &stamp());
    let destination = output_path(output_dir, &unique);
    (unique, destination)
}

/// Local time down to the microsecond, e.g. `20240131235959123456`.
pub fn timestamp_suffix() -> String {
    chrono::Local::now().format("%Y%m%d%H%M%S%6f").to_string()
}

/// Rename `from` to `to`, copying across file systems when a rename is impossible.
pub async fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    tokio::fs::copy(from, to).await?;
    tokio::fs::remove_file(from).await
}

fn output_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{name}.{OUTPUT_EXTENSION}"))
}
