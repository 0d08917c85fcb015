use std::path::PathBuf;
use std::sync::Arc;

use boombox_core::{resolve_worker_count, DeliveryTarget, RunSummary};
use engine_logging::engine_info;

use crate::aggregate::aggregate;
use crate::fetch::{MediaFetcher, YtDlpFetcher};
use crate::list_file::WorkListFile;
use crate::persist::ensure_output_dir;
use crate::probe::{AudioInspector, FfprobeInspector};
use crate::scheduler::{run_all, ProgressSink};
use crate::task::{Normalizer, NormalizerSettings};
use crate::tools::{available_cpus, ToolNames, ToolPaths};
use crate::transcode::{FfmpegTranscoder, TranscodeProfile, Transcoder};
use crate::EngineError;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub output_dir: PathBuf,
    pub temp_root: Option<PathBuf>,
    pub manifest_path: PathBuf,
    pub delivery: DeliveryTarget,
    pub profile: TranscodeProfile,
    pub tools: ToolNames,
    /// CPU count used for automatic worker sizing.
    pub cpus: usize,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            temp_root: None,
            manifest_path: PathBuf::from("done-urllist.txt"),
            delivery: DeliveryTarget::default(),
            profile: TranscodeProfile::default(),
            tools: ToolNames::default(),
            cpus: available_cpus(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::default_with_output(PathBuf::from("music"))
    }
}

/// The external capabilities a run depends on.
#[derive(Clone)]
pub struct Toolset {
    pub fetcher: Arc<dyn MediaFetcher>,
    pub inspector: Arc<dyn AudioInspector>,
    pub transcoder: Arc<dyn Transcoder>,
}

impl Toolset {
    /// Subprocess-backed tools at already resolved locations.
    pub fn external(paths: &ToolPaths) -> Self {
        Self {
            fetcher: Arc::new(YtDlpFetcher::new(paths.fetch.clone())),
            inspector: Arc::new(FfprobeInspector::new(paths.probe.clone())),
            transcoder: Arc::new(FfmpegTranscoder::new(paths.transcode.clone())),
        }
    }

    /// Resolve the configured tool names on `PATH`; any missing tool is fatal.
    pub fn discover(names: &ToolNames) -> Result<Self, EngineError> {
        let paths = ToolPaths::discover(names)?;
        engine_info!(
            "Using tools: fetch={:?} transcode={:?} probe={:?}",
            paths.fetch,
            paths.transcode,
            paths.probe
        );
        Ok(Self::external(&paths))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The list already ends with the sentinel; nothing was touched.
    AlreadyCompleted,
    /// No runnable entries; nothing was written.
    NothingToDo,
    Finished(RunReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub summary: RunSummary,
    pub workers: usize,
    pub manifest_path: PathBuf,
    /// Whether the completion marker made it into the list file.
    pub marked_completed: bool,
}

/// Owns the runtime and the task pipeline for one or more runs.
pub struct EngineHandle {
    config: EngineConfig,
    normalizer: Arc<Normalizer>,
    runtime: tokio::runtime::Runtime,
}

impl EngineHandle {
    pub fn new(config: EngineConfig, toolset: Toolset) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(EngineError::Runtime)?;
        let settings = NormalizerSettings {
            output_dir: config.output_dir.clone(),
            temp_root: config.temp_root.clone(),
            delivery: config.delivery.clone(),
            profile: config.profile.clone(),
        };
        let normalizer = Arc::new(Normalizer::new(
            settings,
            toolset.fetcher,
            toolset.inspector,
            toolset.transcoder,
        ));
        Ok(Self {
            config,
            normalizer,
            runtime,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process `work_list` end to end: parse, run all items, write the manifest, mark the list.
    ///
    /// `requested_workers <= 0` selects automatic sizing.
    pub fn run_work_list(
        &self,
        work_list: &WorkListFile,
        requested_workers: i64,
        sink: &dyn ProgressSink,
    ) -> Result<RunOutcome, EngineError> {
        if work_list.is_completed() {
            engine_info!("{:?} is already completed", work_list.path());
            return Ok(RunOutcome::AlreadyCompleted);
        }

        let parsed = work_list.parse();
        for line in &parsed.malformed {
            sink.skipped(line);
        }
        if parsed.items.is_empty() {
            engine_info!("{:?} has no runnable entries", work_list.path());
            return Ok(RunOutcome::NothingToDo);
        }

        ensure_output_dir(&self.config.output_dir)?;

        let item_count = parsed.items.len();
        let workers = resolve_worker_count(requested_workers, item_count, self.config.cpus);
        engine_info!(
            "Processing {} items; cpus={} workers={}",
            item_count,
            self.config.cpus,
            workers
        );

        let results = self.runtime.block_on(run_all(
            self.normalizer.clone(),
            parsed.items,
            workers,
            sink,
        ));

        let (summary, marked_completed) =
            aggregate(&results, &self.config.manifest_path, work_list)?;
        engine_info!(
            "Run finished: {} succeeded, {} failed",
            summary.succeeded,
            summary.failed
        );

        Ok(RunOutcome::Finished(RunReport {
            summary,
            workers,
            manifest_path: self.config.manifest_path.clone(),
            marked_completed,
        }))
    }
}
