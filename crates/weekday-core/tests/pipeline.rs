use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use weekday_core::{
    DurationStyle, DurationWidths, FormatRequest, LocaleDataService, LocaleId, LocaleTextService,
    OverrideRegistry, Strategy, StrategyDatabase, WeekdayError, build_database,
    formatter_from_parts, graphemes,
};

fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../static")
}

fn sample_service() -> LocaleDataService {
    LocaleDataService::load(&static_dir().join("locale_data.json")).expect("sample locale data")
}

fn sample_candidates() -> Vec<String> {
    fs::read_to_string(static_dir().join("locale_candidates.txt"))
        .expect("sample candidates")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[test]
fn sample_build_matches_committed_database() {
    let service = sample_service();
    let outcome = build_database(&service, sample_candidates(), &OverrideRegistry::builtin())
        .expect("sample build succeeds");

    let committed = StrategyDatabase::load(&static_dir().join("weekday_strategy.json"), &service)
        .expect("committed database loads");

    assert_eq!(outcome.database, committed);
    assert_eq!(outcome.counts.unsupported, 1);
    assert_eq!(outcome.counts.language_mismatch, 2);
}

#[test]
fn written_database_round_trips_through_disk() {
    let service = sample_service();
    let outcome =
        build_database(&service, sample_candidates(), &OverrideRegistry::builtin()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weekday_strategy.json");
    let serialized = serde_json::to_string_pretty(&outcome.database.to_file()).unwrap();
    fs::write(&path, serialized).unwrap();

    let reloaded = StrategyDatabase::load(&path, &service).unwrap();
    assert_eq!(reloaded, outcome.database);
    assert_eq!(reloaded.summary(), outcome.database.summary());
}

#[test]
fn strategies_follow_label_shapes() {
    let service = sample_service();
    let outcome =
        build_database(&service, sample_candidates(), &OverrideRegistry::builtin()).unwrap();
    let db = &outcome.database;
    let id = |raw: &str| LocaleId::parse(raw).unwrap();

    assert_eq!(db.get(&id("es")), Some(&Strategy::Narrow));
    assert_eq!(db.get(&id("en")), Some(&Strategy::Truncate { graphemes: 2 }));
    assert_eq!(db.get(&id("pt")), Some(&Strategy::Truncate { graphemes: 3 }));
    assert!(matches!(db.get(&id("oc")), Some(Strategy::Custom { .. })));
    // Registry entries are written even without a candidate.
    assert!(matches!(db.get(&id("sw")), Some(Strategy::Custom { .. })));
    assert!(!db.contains(&id("en-US")));
}

#[test]
fn ambiguous_sample_locale_needs_its_override() {
    let service = sample_service();
    let err = build_database(&service, ["en", "oc"], &OverrideRegistry::empty()).unwrap_err();
    match err {
        WeekdayError::UnresolvedAmbiguity(report) => {
            assert_eq!(report.canonical_ids(), vec!["oc"]);
            assert_eq!(report.locales[0].collisions[0].token, "dim");
            assert_eq!(report.locales[0].collisions[0].days, vec![0, 2]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn every_committed_locale_resolves_to_seven_distinct_tokens() {
    let service: Arc<dyn LocaleTextService> = Arc::new(sample_service());
    let database = Arc::new(
        StrategyDatabase::load(
            &static_dir().join("weekday_strategy.json"),
            service.as_ref(),
        )
        .unwrap(),
    );
    let formatter = formatter_from_parts(
        database.clone(),
        service,
        LocaleId::english(),
        DurationWidths::default(),
        chrono_tz::Tz::UTC,
    )
    .unwrap();

    for (locale, _) in database.iter() {
        let week = (0..7)
            .map(|day| formatter.resolver().resolve(locale.as_str(), day).unwrap())
            .collect::<Vec<_>>();
        assert!(graphemes::all_distinct(&week), "{locale}: {week:?}");
    }
}

#[test]
fn formats_sample_locales_end_to_end() {
    let service: Arc<dyn LocaleTextService> = Arc::new(sample_service());
    let database = Arc::new(
        StrategyDatabase::load(
            &static_dir().join("weekday_strategy.json"),
            service.as_ref(),
        )
        .unwrap(),
    );
    let formatter = formatter_from_parts(
        database,
        service,
        LocaleId::english(),
        DurationWidths::default(),
        chrono_tz::Tz::UTC,
    )
    .unwrap();

    // Sunday, two months after the reference.
    let target = Utc.with_ymd_and_hms(2026, 1, 25, 12, 0, 0).unwrap();
    let reference = Utc.with_ymd_and_hms(2025, 11, 25, 12, 0, 0).unwrap();
    let format = |locale: &str, style: DurationStyle| {
        formatter
            .format(
                &FormatRequest::new(target, locale)
                    .reference(reference)
                    .style(style),
            )
            .unwrap()
            .text()
    };

    assert_eq!(format("en-US", DurationStyle::Terse), "Su (2 mo.)");
    assert_eq!(format("en", DurationStyle::Verbose), "Su (in 2 months)");
    // Text shared outside the number is kept.
    assert_eq!(format("es-MX", DurationStyle::Terse), "D (e 2 m)");
    assert_eq!(format("de", DurationStyle::Terse), "So (2 Mon.)");
    assert_eq!(format("pt-BR", DurationStyle::Terse), "dom (2 meses)");
    assert_eq!(format("he", DurationStyle::Verbose), "א׳ (בעוד חודשיים)");
    assert_eq!(format("he", DurationStyle::Terse), "א׳ (חודשיים)");
    assert_eq!(format("ja", DurationStyle::Terse), "日 (2 か月)");
    // Unknown locales land on the default.
    assert_eq!(format("xx-ZZ", DurationStyle::Terse), "Su (2 mo.)");
    // Native digits.
    assert_eq!(format("ar-EG", DurationStyle::Terse), "ح (٢ شهر)");
    assert_eq!(format("ar", DurationStyle::Verbose), "ح (بعد ٢ شهر)");
}

#[test]
fn formats_every_custom_locale() {
    let service: Arc<dyn LocaleTextService> = Arc::new(sample_service());
    let database = Arc::new(
        StrategyDatabase::load(
            &static_dir().join("weekday_strategy.json"),
            service.as_ref(),
        )
        .unwrap(),
    );
    let formatter = formatter_from_parts(
        database.clone(),
        service,
        LocaleId::parse("en-US").unwrap(),
        DurationWidths::default(),
        chrono_tz::Tz::UTC,
    )
    .unwrap();

    let target = Utc.with_ymd_and_hms(2026, 1, 25, 12, 0, 0).unwrap();
    let reference = Utc.with_ymd_and_hms(2025, 11, 25, 12, 0, 0).unwrap();
    let format = |locale: &str| {
        formatter
            .format(&FormatRequest::new(target, locale).reference(reference))
            .unwrap()
    };

    assert_eq!(format("oc").text(), "dimg (2 mes)");
    let regional = format("oc-FR");
    assert_eq!(regional.locale, "oc-FR");
    assert_eq!(regional.text(), "dimg (2 mes)");
    assert_eq!(format("sw").text(), "Jpl (miezi 2)");
    assert_eq!(format("ur-PK").text(), "اتو (2 ماہ)");
    // No locale text for Punjabi, so the duration uses the default locale.
    assert_eq!(format("pa-PK").text(), "اتو (2 mo.)");

    for (locale, strategy) in database.iter() {
        if matches!(strategy, Strategy::Custom { .. }) {
            let formatted = format(locale.as_str());
            assert_eq!(formatted.locale, locale.as_str());
            assert!(!formatted.duration.is_empty(), "{locale}");
        }
    }
}
