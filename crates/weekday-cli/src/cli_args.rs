use std::path::PathBuf;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use weekday_core::DurationStyle;

/// Top-level CLI entrypoint.
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Adaptive weekday abbreviations and relative durations", long_about = None)]
pub struct Cli {
    /// Strategy database JSON (defaults to config, env, then `static/`).
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub database: Option<PathBuf>,

    /// Locale data dump JSON (defaults to config, env, then `static/`).
    #[arg(long = "locale-data", global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub locale_data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print "{weekday} ({duration})" for a target time.
    Format(FormatArgs),
    /// Print the seven weekday abbreviations of a locale.
    Weekdays(WeekdaysArgs),
}

#[derive(Debug, Clone, Args)]
pub struct FormatArgs {
    /// Target timestamp (RFC 3339).
    #[arg(long = "to", value_name = "TIMESTAMP", value_parser = parse_timestamp)]
    pub to: DateTime<Utc>,

    /// Reference timestamp (RFC 3339); defaults to now.
    #[arg(long = "from", value_name = "TIMESTAMP", value_parser = parse_timestamp)]
    pub from: Option<DateTime<Utc>>,

    /// Locale id; defaults to the configured default locale.
    #[arg(long)]
    pub locale: Option<String>,

    /// `terse` drops the direction ("2 mo."), `verbose` keeps it ("in 2 months").
    #[arg(long, value_name = "STYLE", default_value = "terse")]
    pub style: DurationStyle,

    /// IANA zone used to pick the weekday; defaults to the configured zone.
    #[arg(long, value_name = "ZONE", value_parser = parse_timezone)]
    pub timezone: Option<Tz>,

    /// Emit the structured parts as JSON.
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct WeekdaysArgs {
    /// Locale id; defaults to the configured default locale.
    #[arg(long)]
    pub locale: Option<String>,
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| format!("expected an RFC 3339 timestamp: {err}"))
}

pub fn parse_timezone(raw: &str) -> Result<Tz, String> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|err| format!("unknown timezone {raw:?}: {err}"))
}
