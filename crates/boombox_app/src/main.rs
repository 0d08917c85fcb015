mod platform;

use std::process::ExitCode;

use clap::Parser;

fn main() -> anyhow::Result<ExitCode> {
    let cli = platform::cli::Cli::parse();
    platform::logging::initialize(cli.log_destination(), cli.verbose);
    platform::app::run(&cli)
}
