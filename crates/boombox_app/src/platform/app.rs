use std::process::ExitCode;

use anyhow::Context;
use boombox_engine::{
    ensure_output_dir, ConsoleProgressSink, EngineHandle, RunOutcome, Toolset, WorkListFile,
};
use engine_logging::engine_info;

use super::cli::Cli;
use super::config::load_engine_config;

/// Exit status when the work list does not exist.
const EXIT_MISSING_LIST: u8 = 1;

pub(crate) fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let config = load_engine_config(cli.config.as_deref())?;
    ensure_output_dir(&config.output_dir)
        .with_context(|| format!("preparing output directory {:?}", config.output_dir))?;

    if !cli.list.exists() {
        let cwd = std::env::current_dir().unwrap_or_default();
        println!("{} not found (working directory: {})", cli.list.display(), cwd.display());
        return Ok(ExitCode::from(EXIT_MISSING_LIST));
    }

    let toolset = Toolset::discover(&config.tools)?;
    let manifest_path = config.manifest_path.clone();
    let engine = EngineHandle::new(config, toolset)?;

    let work_list = WorkListFile::load(&cli.list)
        .with_context(|| format!("reading work list {:?}", cli.list))?;
    engine_info!("Loaded {} lines from {:?}", work_list.lines().len(), cli.list);

    match engine.run_work_list(&work_list, cli.threads, &ConsoleProgressSink)? {
        RunOutcome::AlreadyCompleted => {
            println!("This list has already been completed; edit it before running again.");
        }
        RunOutcome::NothingToDo => {
            println!("The list is empty or only contains done.");
        }
        RunOutcome::Finished(report) => {
            println!(
                "Finished with {} workers. Succeeded: {}, failed: {}; manifest: {}",
                report.workers,
                report.summary.succeeded,
                report.summary.failed,
                manifest_path.display()
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}
