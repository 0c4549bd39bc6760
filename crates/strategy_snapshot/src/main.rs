use clap::Parser;

use strategy_snapshot::config::CliArgs;
use weekday_core::{LoggingDestination, init_logging};

#[tokio::main]
async fn main() {
    let cli = CliArgs::parse();
    if let Err(err) = init_logging(LoggingDestination::StderrOnly) {
        eprintln!("warning: logging unavailable: {err}");
    }
    if let Err(err) = strategy_snapshot::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
