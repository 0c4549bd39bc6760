//! Offline classification of candidate locales into weekday strategies.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::database::StrategyDatabase;
use crate::error::{AmbiguityReport, AmbiguousLocale, Result, WeekdayError};
use crate::graphemes;
use crate::locale::{LocaleId, requested_language};
use crate::registry::OverrideRegistry;
use crate::strategy::{Strategy, TRUNCATE_WIDTHS, truncate_set};
use crate::text_service::{LocaleTextService, WeekdaySet, WeekdayWidth};

/// Result of running the narrow → truncate(2) → truncate(3) ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Distinct(Strategy),
    Ambiguous {
        narrow: WeekdaySet,
        short: WeekdaySet,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    Unsupported,
    LanguageMismatch { resolved: LocaleId },
    MissingLabels(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    Excluded {
        requested: String,
        reason: ExclusionReason,
    },
    Classified {
        requested: String,
        canonical: LocaleId,
        classification: Classification,
    },
}

/// Classifies one resolved locale. The short set is only fetched when the
/// narrow set collides.
pub fn classify_locale<S>(service: &S, locale: &LocaleId) -> Result<Classification>
where
    S: LocaleTextService + ?Sized,
{
    let narrow = service.weekday_labels(locale, WeekdayWidth::Narrow)?;
    if graphemes::all_distinct(narrow.labels()) {
        return Ok(Classification::Distinct(Strategy::Narrow));
    }

    let short = service.weekday_labels(locale, WeekdayWidth::Short)?;
    Ok(classify_short(narrow, short))
}

fn classify_short(narrow: WeekdaySet, short: WeekdaySet) -> Classification {
    for width in TRUNCATE_WIDTHS {
        let truncated = truncate_set(&short, usize::from(width));
        if graphemes::all_distinct(&truncated) {
            return Classification::Distinct(Strategy::Truncate { graphemes: width });
        }
    }
    Classification::Ambiguous { narrow, short }
}

/// Resolves and classifies a single requested identifier.
pub fn classify_candidate<S>(service: &S, requested: &str) -> CandidateOutcome
where
    S: LocaleTextService + ?Sized,
{
    let excluded = |reason| CandidateOutcome::Excluded {
        requested: requested.to_string(),
        reason,
    };

    let Some(canonical) = service.resolve_locale(requested) else {
        return excluded(ExclusionReason::Unsupported);
    };

    if canonical.language() != requested_language(requested) {
        return excluded(ExclusionReason::LanguageMismatch {
            resolved: canonical,
        });
    }

    match classify_locale(service, &canonical) {
        Ok(classification) => CandidateOutcome::Classified {
            requested: requested.to_string(),
            canonical,
            classification,
        },
        Err(err) => excluded(ExclusionReason::MissingLabels(err.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLocale {
    pub requested: String,
    pub classification: Classification,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationCounts {
    pub candidates: usize,
    pub unsupported: usize,
    pub language_mismatch: usize,
    pub missing_labels: usize,
    pub duplicate_canonical: usize,
}

/// Per-worker or global accumulation of outcomes, keyed by canonical locale.
///
/// Outcomes must be recorded in candidate order; the first requested id that
/// reaches a canonical locale is kept and later ones only count as duplicates.
#[derive(Debug, Clone, Default)]
pub struct ClassificationSet {
    classified: BTreeMap<LocaleId, ClassifiedLocale>,
    counts: ClassificationCounts,
}

impl ClassificationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: CandidateOutcome) {
        self.counts.candidates += 1;
        match outcome {
            CandidateOutcome::Excluded { requested, reason } => {
                match &reason {
                    ExclusionReason::Unsupported => self.counts.unsupported += 1,
                    ExclusionReason::LanguageMismatch { .. } => {
                        self.counts.language_mismatch += 1
                    }
                    ExclusionReason::MissingLabels(_) => self.counts.missing_labels += 1,
                }
                debug!(requested = %requested, reason = ?reason, "candidate excluded");
            }
            CandidateOutcome::Classified {
                requested,
                canonical,
                classification,
            } => {
                if self.classified.contains_key(&canonical) {
                    self.counts.duplicate_canonical += 1;
                    return;
                }
                self.classified.insert(
                    canonical,
                    ClassifiedLocale {
                        requested,
                        classification,
                    },
                );
            }
        }
    }

    /// Folds in a set built from later candidates.
    pub fn merge(&mut self, later: ClassificationSet) {
        let ClassificationSet { classified, counts } = later;
        self.counts.candidates += counts.candidates;
        self.counts.unsupported += counts.unsupported;
        self.counts.language_mismatch += counts.language_mismatch;
        self.counts.missing_labels += counts.missing_labels;
        self.counts.duplicate_canonical += counts.duplicate_canonical;

        for (canonical, entry) in classified {
            if self.classified.contains_key(&canonical) {
                self.counts.duplicate_canonical += 1;
            } else {
                self.classified.insert(canonical, entry);
            }
        }
    }

    pub fn counts(&self) -> ClassificationCounts {
        self.counts
    }

    pub fn get(&self, canonical: &LocaleId) -> Option<&ClassifiedLocale> {
        self.classified.get(canonical)
    }

    pub fn len(&self) -> usize {
        self.classified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classified.is_empty()
    }
}

/// Classifies candidates in order on the current thread.
pub fn classify_all<S, I, T>(service: &S, candidates: I) -> ClassificationSet
where
    S: LocaleTextService + ?Sized,
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut set = ClassificationSet::new();
    for candidate in candidates {
        set.record(classify_candidate(service, candidate.as_ref()));
    }
    set
}

#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub database: StrategyDatabase,
    pub counts: ClassificationCounts,
    /// Overrides that replaced a strategy the classifier had found on its own.
    pub overridden: Vec<LocaleId>,
}

/// Combines classification results with the override registry.
///
/// Every registry entry lands in the database and wins over automatic
/// classification. Ambiguous locales without an entry fail the build with the
/// complete list.
pub fn assemble(set: ClassificationSet, registry: &OverrideRegistry) -> Result<BuildOutcome> {
    registry.validate()?;

    let counts = set.counts;
    let mut entries = BTreeMap::new();
    let mut overridden = Vec::new();
    let mut report = AmbiguityReport::default();

    for (canonical, entry) in set.classified {
        if registry.contains(&canonical) {
            if let Classification::Distinct(strategy) = &entry.classification {
                warn!(locale = %canonical, automatic = %strategy, "override replaces automatic strategy");
                overridden.push(canonical.clone());
            }
            continue;
        }

        match entry.classification {
            Classification::Distinct(strategy) => {
                entries.insert(canonical, strategy);
            }
            Classification::Ambiguous { narrow, short } => {
                let collisions = graphemes::duplicates(&truncate_set(&short, 3));
                report.locales.push(AmbiguousLocale {
                    canonical: canonical.to_string(),
                    requested: entry.requested,
                    narrow: narrow.labels().to_vec(),
                    short: short.labels().to_vec(),
                    collisions,
                });
            }
        }
    }

    if !report.is_empty() {
        return Err(WeekdayError::UnresolvedAmbiguity(report));
    }

    for (locale, tokens) in registry.iter() {
        entries.insert(
            locale.clone(),
            Strategy::Custom {
                tokens: tokens.clone(),
            },
        );
    }

    let database = StrategyDatabase::from_entries(entries);
    let summary = database.summary();
    info!(
        total = summary.total,
        narrow = summary.narrow,
        truncate2 = summary.truncate2,
        truncate3 = summary.truncate3,
        custom = summary.custom,
        candidates = counts.candidates,
        unsupported = counts.unsupported,
        language_mismatch = counts.language_mismatch,
        "strategy database assembled"
    );

    Ok(BuildOutcome {
        database,
        counts,
        overridden,
    })
}

/// Sequential build: classify every candidate, then assemble.
pub fn build_database<S, I, T>(
    service: &S,
    candidates: I,
    registry: &OverrideRegistry,
) -> Result<BuildOutcome>
where
    S: LocaleTextService + ?Sized,
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    assemble(classify_all(service, candidates), registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale_data::LocaleDataService;

    fn set(values: [&str; 7]) -> WeekdaySet {
        WeekdaySet::new(values.map(String::from))
    }

    #[test]
    fn distinct_narrow_set_wins() {
        let service = LocaleDataService::new().with_locale(
            "es",
            ["D", "L", "M", "X", "J", "V", "S"],
            ["dom", "lun", "mar", "mié", "jue", "vie", "sáb"],
        );
        let locale = LocaleId::parse("es").unwrap();
        assert_eq!(
            classify_locale(&service, &locale).unwrap(),
            Classification::Distinct(Strategy::Narrow)
        );
    }

    #[test]
    fn colliding_narrow_falls_back_to_two_graphemes() {
        let service = LocaleDataService::new().with_locale(
            "zz",
            ["S", "M", "T", "W", "T", "F", "S"],
            ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
        );
        let locale = LocaleId::parse("zz").unwrap();
        assert_eq!(
            classify_locale(&service, &locale).unwrap(),
            Classification::Distinct(Strategy::Truncate { graphemes: 2 })
        );
    }

    #[test]
    fn three_graphemes_when_two_collide() {
        let outcome = classify_short(
            set(["D", "S", "T", "Q", "Q", "S", "S"]),
            set(["dom.", "seg.", "ter.", "qua.", "qui.", "sex.", "sáb."]),
        );
        assert_eq!(
            outcome,
            Classification::Distinct(Strategy::Truncate { graphemes: 3 })
        );
    }

    #[test]
    fn ambiguous_when_every_width_collides() {
        let outcome = classify_short(
            set(["a", "b", "a", "c", "d", "e", "f"]),
            set(["aaaa", "bbbb", "aaab", "cccc", "dddd", "eeee", "ffff"]),
        );
        assert!(matches!(outcome, Classification::Ambiguous { .. }));
    }

    #[test]
    fn language_mismatch_is_excluded() {
        let service = LocaleDataService::new()
            .with_locale(
                "ro",
                ["D", "L", "M", "M", "J", "V", "S"],
                ["dum.", "lun.", "mar.", "mie.", "joi", "vin.", "sâm."],
            )
            .with_alias("mo", "ro");

        let outcome = classify_candidate(&service, "mo");
        assert!(matches!(
            outcome,
            CandidateOutcome::Excluded {
                reason: ExclusionReason::LanguageMismatch { .. },
                ..
            }
        ));
        assert!(matches!(
            classify_candidate(&service, "qq"),
            CandidateOutcome::Excluded {
                reason: ExclusionReason::Unsupported,
                ..
            }
        ));
    }

    #[test]
    fn first_requested_code_wins_per_canonical_locale() {
        let service = LocaleDataService::new()
            .with_locale(
                "zz",
                ["S", "M", "T", "W", "T", "F", "S"],
                ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            )
            .with_alias("zz-AA", "zz")
            .with_alias("zz-BB", "zz");

        let set = classify_all(&service, ["zz-AA", "zz-BB", "zz"]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.counts().duplicate_canonical, 2);
        let entry = set.get(&LocaleId::parse("zz").unwrap()).unwrap();
        assert_eq!(entry.requested, "zz-AA");
    }

    #[test]
    fn merge_keeps_earlier_partition() {
        let service = LocaleDataService::new()
            .with_locale(
                "zz",
                ["S", "M", "T", "W", "T", "F", "S"],
                ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            )
            .with_alias("zz-AA", "zz");

        let mut first = classify_all(&service, ["zz-AA", "nope"]);
        let second = classify_all(&service, ["zz"]);
        first.merge(second);

        assert_eq!(first.counts().candidates, 3);
        assert_eq!(first.counts().unsupported, 1);
        assert_eq!(first.counts().duplicate_canonical, 1);
        assert_eq!(
            first.get(&LocaleId::parse("zz").unwrap()).unwrap().requested,
            "zz-AA"
        );
    }

    fn ambiguous_service() -> LocaleDataService {
        LocaleDataService::new()
            .with_locale(
                "zz",
                ["S", "M", "T", "W", "T", "F", "S"],
                ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            )
            .with_locale(
                "qq",
                ["a", "b", "a", "c", "d", "e", "f"],
                ["aaaa", "bbbb", "aaab", "cccc", "dddd", "eeee", "ffff"],
            )
    }

    #[test]
    fn unresolved_ambiguity_fails_the_build() {
        let service = ambiguous_service();
        let err = build_database(&service, ["zz", "qq"], &OverrideRegistry::empty()).unwrap_err();
        match err {
            WeekdayError::UnresolvedAmbiguity(report) => {
                assert_eq!(report.canonical_ids(), vec!["qq"]);
                assert_eq!(report.locales[0].collisions[0].token, "aaa");
                assert_eq!(report.locales[0].collisions[0].days, vec![0, 2]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn override_resolves_ambiguity() {
        let service = ambiguous_service();
        let mut registry = OverrideRegistry::empty();
        registry
            .insert("qq", ["q0", "q1", "q2", "q3", "q4", "q5", "q6"].map(String::from))
            .unwrap();

        let outcome = build_database(&service, ["zz", "qq"], &registry).unwrap();
        let qq = LocaleId::parse("qq").unwrap();
        assert!(matches!(
            outcome.database.get(&qq),
            Some(Strategy::Custom { .. })
        ));
        assert_eq!(
            outcome.database.get(&LocaleId::parse("zz").unwrap()),
            Some(&Strategy::Truncate { graphemes: 2 })
        );
        assert!(outcome.overridden.is_empty());
    }

    #[test]
    fn override_wins_over_automatic_strategy() {
        let service = ambiguous_service();
        let mut registry = OverrideRegistry::empty();
        let custom = ["z0", "z1", "z2", "z3", "z4", "z5", "z6"].map(String::from);
        registry.insert("zz", custom.clone()).unwrap();
        registry
            .insert("qq", ["q0", "q1", "q2", "q3", "q4", "q5", "q6"].map(String::from))
            .unwrap();

        let outcome = build_database(&service, ["zz", "qq"], &registry).unwrap();
        let zz = LocaleId::parse("zz").unwrap();
        assert_eq!(
            outcome.database.get(&zz),
            Some(&Strategy::Custom { tokens: custom })
        );
        assert_eq!(outcome.overridden, vec![zz]);
    }

    #[test]
    fn registry_only_locales_are_included() {
        let service = ambiguous_service();
        let outcome =
            build_database(&service, ["zz"], &OverrideRegistry::builtin()).unwrap();
        assert_eq!(outcome.database.len(), 15);
        assert!(outcome.database.get(&LocaleId::parse("ur-PK").unwrap()).is_some());
    }
}
