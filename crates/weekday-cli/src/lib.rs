pub mod cli_args;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;
use weekday_core::{
    FormatRequest, LocaleTextService, LookupSource, RuntimeConfig, StrategyDatabase,
    WeekdayFormatter, discover_database, discover_locale_data, formatter_from_parts,
};

use cli_args::{Cli, Command, FormatArgs, WeekdaysArgs};

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Loads the locale data and database, then runs `cli.command`, writing to `out`.
pub fn run(cli: Cli, config: &RuntimeConfig, out: &mut impl Write) -> Result<()> {
    let formatter = load_formatter(&cli, config)?;
    match &cli.command {
        Command::Format(args) => format_command(&formatter, config, args, out),
        Command::Weekdays(args) => weekdays_command(&formatter, config, args, out),
    }
}

fn load_formatter(cli: &Cli, config: &RuntimeConfig) -> Result<WeekdayFormatter> {
    let locale_data_path = cli
        .locale_data
        .as_deref()
        .or(config.locale_data_path.as_deref());
    let service: Arc<dyn LocaleTextService> = Arc::new(
        discover_locale_data(locale_data_path).context("loading locale data")?,
    );

    let database_path = cli.database.as_deref().or(config.database_path.as_deref());
    let database = Arc::new(load_database(database_path, service.as_ref())?);
    debug!(entries = database.len(), "strategy database ready");

    formatter_from_parts(
        database,
        service,
        config.default_locale(),
        config.duration_widths(),
        config.timezone(),
    )
    .context("building formatter")
}

fn load_database(
    explicit: Option<&Path>,
    service: &dyn LocaleTextService,
) -> Result<StrategyDatabase> {
    discover_database(explicit, service).with_context(|| match explicit {
        Some(path) => format!("loading strategy database {}", path.display()),
        None => "loading strategy database".to_string(),
    })
}

fn format_command(
    formatter: &WeekdayFormatter,
    config: &RuntimeConfig,
    args: &FormatArgs,
    out: &mut impl Write,
) -> Result<()> {
    let locale = args
        .locale
        .clone()
        .unwrap_or_else(|| config.default_locale.clone());
    let mut request = FormatRequest::new(args.to, locale).style(args.style);
    if let Some(reference) = args.from {
        request = request.reference(reference);
    }
    if let Some(timezone) = args.timezone {
        request = request.timezone(timezone);
    }

    let formatted = formatter
        .format(&request)
        .with_context(|| format!("formatting for locale {}", request.locale))?;

    if args.json {
        writeln!(out, "{}", serde_json::to_string(&formatted)?)?;
    } else {
        writeln!(out, "{}", formatted.text())?;
    }
    Ok(())
}

fn weekdays_command(
    formatter: &WeekdayFormatter,
    config: &RuntimeConfig,
    args: &WeekdaysArgs,
    out: &mut impl Write,
) -> Result<()> {
    let requested = args
        .locale
        .clone()
        .unwrap_or_else(|| config.default_locale.clone());
    let resolver = formatter.resolver();
    let found = resolver.lookup(&requested);
    let week = resolver
        .resolve_week(&requested)
        .with_context(|| format!("resolving weekdays for {requested}"))?;

    let matched = match found.source {
        LookupSource::Exact => "exact match",
        LookupSource::Language => "language match",
        LookupSource::Default => "default locale",
    };
    writeln!(
        out,
        "{} ({matched} for {requested}, {})",
        found.key, found.strategy
    )?;
    for (name, token) in DAY_NAMES.iter().zip(week.iter()) {
        writeln!(out, "{name}\t{token}")?;
    }
    Ok(())
}
