use std::io;

use clap::Parser;
use tracing::warn;
use weekday_cli::cli_args::Cli;
use weekday_core::{LoggingDestination, init_logging, load_config};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = init_logging(LoggingDestination::StderrOnly) {
        eprintln!("warning: logging unavailable: {err}");
    }

    let loaded = load_config();
    for warning in &loaded.warnings {
        warn!("{warning}");
    }

    let stdout = io::stdout();
    if let Err(err) = weekday_cli::run(cli, &loaded.config, &mut stdout.lock()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
