//! A [`LocaleTextService`] backed by a JSON locale data dump.
//!
//! The dump is produced by an external tool from real locale data; this module
//! only looks strings up. Resolution follows the alias table, then the exact
//! id, then the language-only id, mirroring how best-fit locale matching
//! drops unknown regions. Label and phrase lookups accept any id that resolves.

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{Result, WeekdayError};
use crate::locale::LocaleId;
use crate::text_service::{
    LocaleTextService, PhraseWidth, RelativeMagnitude, RelativeUnit, WeekdaySet, WeekdayWidth,
};

pub const LOCALE_DATA_ENV: &str = "WEEKDAY_LOCALE_DATA";
const LOCALE_DATA_FILE_NAME: &str = "locale_data.json";
const OTHER_KEY: &str = "other";
const VALUE_PLACEHOLDER: &str = "{0}";

#[derive(Debug, Clone, Default, Deserialize)]
struct LocaleDataFile {
    #[serde(default)]
    aliases: BTreeMap<String, String>,
    locales: BTreeMap<String, LocaleEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct LocaleEntry {
    weekdays: WeekdayLabels,
    #[serde(default)]
    relative: HashMap<PhraseWidth, HashMap<RelativeUnit, DirectionalPatterns>>,
    /// Native digits `0`..`9` substituted into `{0}`.
    #[serde(default)]
    digits: Option<[char; 10]>,
}

#[derive(Debug, Clone, Deserialize)]
struct WeekdayLabels {
    narrow: WeekdaySet,
    short: WeekdaySet,
}

/// Patterns keyed by exact count (`"1"`, `"2"`) with `"other"` as fallback.
#[derive(Debug, Clone, Default, Deserialize)]
struct DirectionalPatterns {
    #[serde(default)]
    future: BTreeMap<String, String>,
    #[serde(default)]
    past: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct LocaleDataService {
    aliases: HashMap<LocaleId, LocaleId>,
    locales: HashMap<LocaleId, LocaleEntry>,
}

impl LocaleDataService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let file: LocaleDataFile = serde_json::from_str(raw)?;

        let mut service = Self::new();
        for (raw_id, entry) in file.locales {
            service.locales.insert(LocaleId::parse(&raw_id)?, entry);
        }
        for (requested, canonical) in file.aliases {
            let canonical = LocaleId::parse(&canonical)?;
            if !service.locales.contains_key(&canonical) {
                return Err(WeekdayError::text_service(format!(
                    "alias {requested} points at unknown locale {canonical}"
                )));
            }
            service
                .aliases
                .insert(LocaleId::parse(&requested)?, canonical);
        }
        Ok(service)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Adds a locale with weekday labels and no relative phrases.
    pub fn with_locale(mut self, id: &str, narrow: [&str; 7], short: [&str; 7]) -> Self {
        if let Ok(id) = LocaleId::parse(id) {
            self.locales.insert(
                id,
                LocaleEntry {
                    weekdays: WeekdayLabels {
                        narrow: WeekdaySet::new(narrow.map(String::from)),
                        short: WeekdaySet::new(short.map(String::from)),
                    },
                    relative: HashMap::new(),
                    digits: None,
                },
            );
        }
        self
    }

    /// Sets the native digits used when substituting counts.
    pub fn with_digits(mut self, id: &str, digits: [char; 10]) -> Self {
        if let Some(entry) = LocaleId::parse(id)
            .ok()
            .and_then(|id| self.locales.get_mut(&id))
        {
            entry.digits = Some(digits);
        }
        self
    }

    pub fn with_alias(mut self, requested: &str, canonical: &str) -> Self {
        if let (Ok(requested), Ok(canonical)) =
            (LocaleId::parse(requested), LocaleId::parse(canonical))
        {
            self.aliases.insert(requested, canonical);
        }
        self
    }

    /// Registers `other` patterns for one unit; the locale must already exist.
    pub fn with_phrases(
        self,
        id: &str,
        width: PhraseWidth,
        unit: RelativeUnit,
        future: &str,
        past: &str,
    ) -> Self {
        self.with_count_phrases(id, width, unit, OTHER_KEY, future, past)
    }

    /// Registers patterns used only for one exact count.
    pub fn with_count_phrases(
        mut self,
        id: &str,
        width: PhraseWidth,
        unit: RelativeUnit,
        count: &str,
        future: &str,
        past: &str,
    ) -> Self {
        if let Some(entry) = LocaleId::parse(id)
            .ok()
            .and_then(|id| self.locales.get_mut(&id))
        {
            let patterns = entry
                .relative
                .entry(width)
                .or_default()
                .entry(unit)
                .or_default();
            patterns.future.insert(count.to_string(), future.to_string());
            patterns.past.insert(count.to_string(), past.to_string());
        }
        self
    }

    /// Every id this dump can answer for, aliases included, sorted.
    pub fn known_ids(&self) -> Vec<String> {
        let mut ids = self
            .locales
            .keys()
            .chain(self.aliases.keys())
            .map(LocaleId::to_string)
            .collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        ids
    }

    fn entry(&self, locale: &LocaleId) -> Result<&LocaleEntry> {
        self.locales
            .get(locale)
            .or_else(|| {
                self.resolve_locale(locale.as_str())
                    .and_then(|canonical| self.locales.get(&canonical))
            })
            .ok_or_else(|| WeekdayError::text_service(format!("no locale data for {locale}")))
    }
}

impl LocaleTextService for LocaleDataService {
    fn resolve_locale(&self, requested: &str) -> Option<LocaleId> {
        let id = LocaleId::parse(requested).ok()?;
        if let Some(canonical) = self.aliases.get(&id) {
            return Some(canonical.clone());
        }
        if self.locales.contains_key(&id) {
            return Some(id);
        }
        if id.has_subtags() {
            let language = id.language_only();
            if let Some(canonical) = self.aliases.get(&language) {
                return Some(canonical.clone());
            }
            if self.locales.contains_key(&language) {
                return Some(language);
            }
        }
        None
    }

    fn weekday_labels(&self, locale: &LocaleId, width: WeekdayWidth) -> Result<WeekdaySet> {
        let entry = self.entry(locale)?;
        Ok(match width {
            WeekdayWidth::Narrow => entry.weekdays.narrow.clone(),
            WeekdayWidth::Short => entry.weekdays.short.clone(),
        })
    }

    fn relative_time_phrase(
        &self,
        locale: &LocaleId,
        signed_value: f64,
        unit: RelativeUnit,
        width: PhraseWidth,
    ) -> Result<String> {
        let entry = self.entry(locale)?;
        let patterns = entry
            .relative
            .get(&width)
            .and_then(|units| units.get(&unit))
            .ok_or_else(|| {
                WeekdayError::text_service(format!(
                    "{locale} has no {} phrases for {unit}",
                    width.as_str()
                ))
            })?;

        let table = if signed_value.is_sign_negative() {
            &patterns.past
        } else {
            &patterns.future
        };

        let magnitude = signed_value.abs();
        let count = if magnitude.fract() == 0.0 {
            format!("{}", magnitude as u64)
        } else {
            magnitude.to_string()
        };

        let pattern = table
            .get(&count)
            .or_else(|| table.get(OTHER_KEY))
            .ok_or_else(|| {
                WeekdayError::text_service(format!(
                    "{locale} has no pattern for {count} {unit} ({})",
                    width.as_str()
                ))
            })?;

        let rendered = match &entry.digits {
            Some(digits) => localize_digits(&count, digits),
            None => count,
        };
        Ok(pattern.replace(VALUE_PLACEHOLDER, &rendered))
    }

    fn relative_magnitude(
        &self,
        target: DateTime<Utc>,
        reference: DateTime<Utc>,
    ) -> RelativeMagnitude {
        select_magnitude(target.signed_duration_since(reference).num_seconds())
    }
}

fn localize_digits(count: &str, digits: &[char; 10]) -> String {
    count
        .chars()
        .map(|ch| match ch.to_digit(10) {
            Some(value) => digits[value as usize],
            None => ch,
        })
        .collect()
}

/// Search order for the locale data dump: explicit path (exclusive when
/// given), env, `./static`, then the workspace `static/` directory.
pub fn locale_data_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }
    let mut candidates = Vec::new();
    if let Ok(path) = env::var(LOCALE_DATA_ENV) {
        if !path.trim().is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }
    if let Ok(current_dir) = env::current_dir() {
        candidates.push(current_dir.join("static").join(LOCALE_DATA_FILE_NAME));
    }
    candidates.push(
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../static")
            .join(LOCALE_DATA_FILE_NAME),
    );
    candidates
}

pub fn discover_locale_data(explicit: Option<&Path>) -> Result<LocaleDataService> {
    let candidates = locale_data_candidates(explicit);
    for path in &candidates {
        if path.exists() {
            return LocaleDataService::load(path);
        }
    }
    let searched = candidates
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(WeekdayError::text_service(format!(
        "no locale data found (searched: {searched})"
    )))
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Largest unit whose span the delta reaches; the value truncates toward zero.
pub fn select_magnitude(delta_seconds: i64) -> RelativeMagnitude {
    let magnitude = delta_seconds.abs();
    let (unit, span) = if magnitude < MINUTE {
        (RelativeUnit::Second, 1)
    } else if magnitude < HOUR {
        (RelativeUnit::Minute, MINUTE)
    } else if magnitude < DAY {
        (RelativeUnit::Hour, HOUR)
    } else if magnitude < WEEK {
        (RelativeUnit::Day, DAY)
    } else if magnitude < MONTH {
        (RelativeUnit::Week, WEEK)
    } else if magnitude < YEAR {
        (RelativeUnit::Month, MONTH)
    } else {
        (RelativeUnit::Year, YEAR)
    };

    RelativeMagnitude {
        value: delta_seconds / span,
        unit,
    }
}
