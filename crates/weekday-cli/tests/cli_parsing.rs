use chrono::{TimeZone, Utc};
use clap::Parser;
use weekday_cli::cli_args::{Cli, Command};
use weekday_core::DurationStyle;

#[test]
fn parses_format_with_defaults() {
    let cli = Cli::try_parse_from(["weekday-cli", "format", "--to", "2026-01-25T12:00:00Z"])
        .expect("valid arguments");
    let Command::Format(args) = cli.command else {
        panic!("expected the format subcommand");
    };
    assert_eq!(args.to, Utc.with_ymd_and_hms(2026, 1, 25, 12, 0, 0).unwrap());
    assert!(args.from.is_none());
    assert!(args.locale.is_none());
    assert_eq!(args.style, DurationStyle::Terse);
    assert!(args.timezone.is_none());
    assert!(!args.json);
}

#[test]
fn parses_every_format_flag() {
    let cli = Cli::try_parse_from([
        "weekday-cli",
        "format",
        "--to",
        "2026-01-25T12:00:00+09:00",
        "--from",
        "2025-11-25T12:00:00Z",
        "--locale",
        "he-IL",
        "--style",
        "verbose",
        "--timezone",
        "Asia/Jerusalem",
        "--json",
        "--database",
        "/tmp/db.json",
    ])
    .expect("valid arguments");

    assert_eq!(
        cli.database.as_deref(),
        Some(std::path::Path::new("/tmp/db.json"))
    );
    let Command::Format(args) = cli.command else {
        panic!("expected the format subcommand");
    };
    assert_eq!(args.to, Utc.with_ymd_and_hms(2026, 1, 25, 3, 0, 0).unwrap());
    assert_eq!(args.locale.as_deref(), Some("he-IL"));
    assert_eq!(args.style, DurationStyle::Verbose);
    assert_eq!(args.timezone, Some(chrono_tz::Asia::Jerusalem));
    assert!(args.json);
}

#[test]
fn rejects_bad_values() {
    assert!(Cli::try_parse_from(["weekday-cli", "format", "--to", "yesterday"]).is_err());
    assert!(
        Cli::try_parse_from([
            "weekday-cli",
            "format",
            "--to",
            "2026-01-25T12:00:00Z",
            "--style",
            "loud"
        ])
        .is_err()
    );
    assert!(
        Cli::try_parse_from([
            "weekday-cli",
            "format",
            "--to",
            "2026-01-25T12:00:00Z",
            "--timezone",
            "Mars/Olympus"
        ])
        .is_err()
    );
    assert!(Cli::try_parse_from(["weekday-cli"]).is_err());
}

#[test]
fn parses_weekdays() {
    let cli = Cli::try_parse_from(["weekday-cli", "weekdays", "--locale", "pt-BR"]).unwrap();
    let Command::Weekdays(args) = cli.command else {
        panic!("expected the weekdays subcommand");
    };
    assert_eq!(args.locale.as_deref(), Some("pt-BR"));
}
