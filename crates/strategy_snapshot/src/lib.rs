pub mod candidates;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod snapshot;

use config::{AppConfig, CliArgs};
use error::SnapshotError;
use pipeline::build;
use snapshot::write_database;

pub async fn run(cli: CliArgs) -> Result<(), SnapshotError> {
    let AppConfig { paths, tunables } = cli.resolve()?;

    let outcome = build(&paths, &tunables).await?;
    let file = write_database(&paths.database, &outcome.database)?;

    let summary = outcome.database.summary();
    println!(
        "Strategy database written to {} (schema v{}): {} locales, {} narrow, {} truncate(2), {} truncate(3), {} custom",
        paths.database.display(),
        file.schema_version,
        summary.total,
        summary.narrow,
        summary.truncate2,
        summary.truncate3,
        summary.custom
    );
    if !outcome.overridden.is_empty() {
        let locales = outcome
            .overridden
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!("Overrides replaced automatic strategies for: {locales}");
    }

    Ok(())
}
