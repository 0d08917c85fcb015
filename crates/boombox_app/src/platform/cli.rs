use std::path::PathBuf;

use clap::Parser;

use super::logging::LogDestination;

/// Fetch a list of audio sources, normalize them to MP3 and publish a manifest.
#[derive(Debug, Parser)]
#[command(name = "boombox", version)]
#[command(about = "Batch fetch and normalize audio into MP3", long_about = None)]
pub(crate) struct Cli {
    /// Work list: one `<source> <name>` per line, optionally closed by `done`
    #[arg(long, default_value = "music_download.txt")]
    pub list: PathBuf,

    /// Parallel workers; 0 or less sizes the pool from the CPU count
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub threads: i64,

    /// RON file overriding output, delivery and tool settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        }
    }
}
