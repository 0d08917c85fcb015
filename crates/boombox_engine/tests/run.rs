mod common;

use std::fs;
use std::path::{Path, PathBuf};

use boombox_core::{RunSummary, SENTINEL};
use boombox_engine::{
    read_text_lines, AudioInfo, EngineConfig, EngineHandle, RunOutcome, WorkListFile,
};
use common::{init_logging, FakeTranscoder, Fakes, RecordingSink};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const BOM: &[u8] = b"\xEF\xBB\xBF";

struct Workspace {
    root: TempDir,
    list_path: PathBuf,
    manifest_path: PathBuf,
    output_dir: PathBuf,
}

impl Workspace {
    fn new(list: &str) -> Self {
        init_logging();
        let root = TempDir::new().unwrap();
        let list_path = root.path().join("music_download.txt");
        let mut bytes = BOM.to_vec();
        bytes.extend_from_slice(list.as_bytes());
        fs::write(&list_path, bytes).unwrap();
        Self {
            list_path,
            manifest_path: root.path().join("done-urllist.txt"),
            output_dir: root.path().join("music"),
            root,
        }
    }

    fn engine(&self, fakes: &Fakes) -> EngineHandle {
        let scratch = self.root.path().join("scratch");
        fs::create_dir_all(&scratch).unwrap();
        let config = EngineConfig {
            temp_root: Some(scratch),
            manifest_path: self.manifest_path.clone(),
            cpus: 4,
            ..EngineConfig::default_with_output(self.output_dir.clone())
        };
        EngineHandle::new(config, fakes.toolset()).unwrap()
    }

    fn run(&self, engine: &EngineHandle, sink: &RecordingSink) -> RunOutcome {
        let list = WorkListFile::load(&self.list_path).unwrap();
        engine.run_work_list(&list, 0, sink).unwrap()
    }
}

fn passthrough_fakes() -> Fakes {
    Fakes::new("mp3", AudioInfo::new("mp3", 192_000), FakeTranscoder::default())
}

fn last_non_blank(path: &Path) -> String {
    read_text_lines(path)
        .unwrap()
        .into_iter()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap()
}

#[test]
fn full_run_writes_manifest_and_marks_list() {
    let ws = Workspace::new(
        "https://media.example/1 First\n\
         not-a-valid-line\n\
         https://media.example/broken Second\n\
         https://media.example/3 Third: Live\n",
    );
    let fakes = passthrough_fakes();
    let engine = ws.engine(&fakes);
    let sink = RecordingSink::default();

    let outcome = ws.run(&engine, &sink);

    let report = match outcome {
        RunOutcome::Finished(report) => report,
        other => panic!("expected a finished run, got {other:?}"),
    };
    assert_eq!(report.summary, RunSummary { succeeded: 2, failed: 1 });
    assert_eq!(report.workers, 3);
    assert!(report.marked_completed);
    assert_eq!(sink.skipped_lines(), vec!["not-a-valid-line".to_string()]);
    assert_eq!(sink.results().len(), 3);

    let manifest = fs::read(&ws.manifest_path).unwrap();
    assert!(manifest.starts_with(BOM));
    let mut lines = read_text_lines(&ws.manifest_path).unwrap();
    lines.sort();
    let cdn = "https://cdn.jsdelivr.net/gh/kenny1108Xiang/RustGame@main/music";
    assert_eq!(
        lines,
        vec![
            format!("boombox.serverurllist \"First,{cdn}/First.mp3\""),
            format!("boombox.serverurllist \"Third_ Live,{cdn}/Third_ Live.mp3\""),
        ]
    );
    assert!(ws.output_dir.join("First.mp3").exists());
    assert!(ws.output_dir.join("Third_ Live.mp3").exists());

    assert_eq!(last_non_blank(&ws.list_path), SENTINEL);
    let raw_list = fs::read(&ws.list_path).unwrap();
    assert!(raw_list.starts_with(BOM));
    assert!(!raw_list[BOM.len()..].starts_with(BOM));
    assert!(raw_list.ends_with(b"Third: Live\ndone"));
}

#[test]
fn second_run_is_a_no_op() {
    let ws = Workspace::new("https://media.example/1 First");
    let fakes = passthrough_fakes();
    let engine = ws.engine(&fakes);
    let sink = RecordingSink::default();

    assert!(matches!(ws.run(&engine, &sink), RunOutcome::Finished(_)));
    assert!(fs::read(&ws.list_path).unwrap().ends_with(b"First\ndone"));
    fs::remove_file(&ws.manifest_path).unwrap();

    let outcome = ws.run(&engine, &sink);

    assert_eq!(outcome, RunOutcome::AlreadyCompleted);
    assert!(!ws.manifest_path.exists());
    let list = WorkListFile::load(&ws.list_path).unwrap();
    assert!(list.is_completed());
    assert!(list.parse().items.is_empty());
}

#[test]
fn completed_list_is_left_untouched() {
    let ws = Workspace::new("https://media.example/1 First\nDONE\n\n");
    let before = fs::read(&ws.list_path).unwrap();
    let fakes = passthrough_fakes();
    let engine = ws.engine(&fakes);
    let sink = RecordingSink::default();

    let outcome = ws.run(&engine, &sink);

    assert_eq!(outcome, RunOutcome::AlreadyCompleted);
    assert_eq!(fs::read(&ws.list_path).unwrap(), before);
    assert!(!ws.manifest_path.exists());
    assert_eq!(fakes.fetcher.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[test]
fn list_without_runnable_entries_does_nothing() {
    let ws = Workspace::new("garbage\n\n   \n");
    let before = fs::read(&ws.list_path).unwrap();
    let fakes = passthrough_fakes();
    let engine = ws.engine(&fakes);
    let sink = RecordingSink::default();

    let outcome = ws.run(&engine, &sink);

    assert_eq!(outcome, RunOutcome::NothingToDo);
    assert_eq!(sink.skipped_lines(), vec!["garbage".to_string()]);
    assert_eq!(fs::read(&ws.list_path).unwrap(), before);
    assert!(!ws.manifest_path.exists());
}

#[test]
fn manifest_is_regenerated_not_appended() {
    let ws = Workspace::new("https://media.example/broken Only");
    fs::write(&ws.manifest_path, "boombox.serverurllist \"Old,https://old\"").unwrap();
    let fakes = passthrough_fakes();
    let engine = ws.engine(&fakes);
    let sink = RecordingSink::default();

    let RunOutcome::Finished(report) = ws.run(&engine, &sink) else {
        panic!("expected a finished run");
    };

    assert_eq!(report.summary, RunSummary { succeeded: 0, failed: 1 });
    assert!(read_text_lines(&ws.manifest_path).unwrap().is_empty());
    assert_eq!(last_non_blank(&ws.list_path), SENTINEL);
}

#[test]
fn explicit_worker_count_overrides_sizing() {
    let ws = Workspace::new("https://media.example/1 A\nhttps://media.example/2 B\n");
    let fakes = passthrough_fakes();
    let engine = ws.engine(&fakes);
    let sink = RecordingSink::default();
    let list = WorkListFile::load(&ws.list_path).unwrap();

    let RunOutcome::Finished(report) = engine.run_work_list(&list, 1, &sink).unwrap() else {
        panic!("expected a finished run");
    };

    assert_eq!(report.workers, 1);
    assert_eq!(report.summary.succeeded, 2);
}
