//! The persisted locale → strategy table.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, WeekdayError};
use crate::graphemes;
use crate::locale::LocaleId;
use crate::registry::validate_tokens;
use crate::strategy::{Strategy, StrategyKind, TRUNCATE_WIDTHS};
use crate::text_service::LocaleTextService;

pub const DATABASE_SCHEMA_VERSION: u32 = 1;
pub const DATABASE_ENV: &str = "WEEKDAY_STRATEGY_DATABASE";
const DATABASE_FILE_NAME: &str = "weekday_strategy.json";

/// Read-only mapping from locale to weekday strategy.
///
/// Built offline, loaded once, then shared (usually behind an `Arc`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyDatabase {
    entries: BTreeMap<LocaleId, Strategy>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub total: usize,
    pub narrow: usize,
    pub truncate2: usize,
    pub truncate3: usize,
    pub custom: usize,
}

/// On-disk representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseFile {
    pub schema_version: u32,
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<StrategySummary>,
    pub strategies: BTreeMap<String, Strategy>,
}

impl StrategyDatabase {
    pub(crate) fn from_entries(entries: BTreeMap<LocaleId, Strategy>) -> Self {
        Self { entries }
    }

    pub fn get(&self, locale: &LocaleId) -> Option<&Strategy> {
        self.entries.get(locale)
    }

    pub fn contains(&self, locale: &LocaleId) -> bool {
        self.entries.contains_key(locale)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LocaleId, &Strategy)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> StrategySummary {
        let mut summary = StrategySummary {
            total: self.entries.len(),
            ..StrategySummary::default()
        };
        for strategy in self.entries.values() {
            match strategy.kind() {
                StrategyKind::Narrow => summary.narrow += 1,
                StrategyKind::Truncate2 => summary.truncate2 += 1,
                StrategyKind::Truncate3 => summary.truncate3 += 1,
                StrategyKind::Custom => summary.custom += 1,
            }
        }
        summary
    }

    pub fn to_file(&self) -> DatabaseFile {
        DatabaseFile {
            schema_version: DATABASE_SCHEMA_VERSION,
            generated_at: Utc::now().to_rfc3339(),
            summary: Some(self.summary()),
            strategies: self
                .entries
                .iter()
                .map(|(locale, strategy)| (locale.to_string(), strategy.clone()))
                .collect(),
        }
    }

    /// Parses a database and checks every entry against `service`.
    pub fn from_json_str<S>(raw: &str, service: &S) -> Result<Self>
    where
        S: LocaleTextService + ?Sized,
    {
        let file: DatabaseFile = serde_json::from_str(raw)?;
        Self::from_file_contents(file, service)
    }

    pub fn load<S>(path: &Path, service: &S) -> Result<Self>
    where
        S: LocaleTextService + ?Sized,
    {
        let raw = fs::read_to_string(path)?;
        let database = Self::from_json_str(&raw, service)?;
        debug!(path = %path.display(), entries = database.len(), "strategy database loaded");
        Ok(database)
    }

    fn from_file_contents<S>(file: DatabaseFile, service: &S) -> Result<Self>
    where
        S: LocaleTextService + ?Sized,
    {
        if file.schema_version != DATABASE_SCHEMA_VERSION {
            return Err(WeekdayError::SchemaVersion {
                expected: DATABASE_SCHEMA_VERSION,
                found: file.schema_version,
            });
        }

        let mut entries = BTreeMap::new();
        for (raw_locale, strategy) in file.strategies {
            let locale = LocaleId::parse(&raw_locale)
                .map_err(|err| WeekdayError::invalid_database(&raw_locale, err.to_string()))?;
            if locale.as_str() != raw_locale {
                return Err(WeekdayError::invalid_database(
                    &raw_locale,
                    format!("locale is not normalized (expected {locale})"),
                ));
            }
            entries.insert(locale, strategy);
        }

        let database = Self { entries };
        database.validate(service)?;

        if let Some(recorded) = file.summary {
            let actual = database.summary();
            if recorded != actual {
                warn!(?recorded, ?actual, "database summary does not match its entries");
            }
        }

        Ok(database)
    }

    /// Checks that every entry yields seven distinct tokens.
    pub fn validate<S>(&self, service: &S) -> Result<()>
    where
        S: LocaleTextService + ?Sized,
    {
        for (locale, strategy) in &self.entries {
            match strategy {
                Strategy::Custom { tokens } => {
                    validate_tokens(locale.as_str(), tokens).map_err(|err| {
                        WeekdayError::invalid_database(locale.as_str(), err.to_string())
                    })?;
                }
                Strategy::Truncate { graphemes: width } if !TRUNCATE_WIDTHS.contains(width) => {
                    return Err(WeekdayError::invalid_database(
                        locale.as_str(),
                        format!("truncate width must be 2 or 3, found {width}"),
                    ));
                }
                Strategy::Narrow | Strategy::Truncate { .. } => {
                    let tokens = strategy.tokens(service, locale).map_err(|err| {
                        WeekdayError::invalid_database(locale.as_str(), err.to_string())
                    })?;
                    if !graphemes::all_distinct(&tokens) {
                        return Err(WeekdayError::invalid_database(
                            locale.as_str(),
                            format!("{strategy} yields duplicate tokens: {}", tokens.join(", ")),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Locations searched for the database, most specific first. An explicit
/// path is the only candidate when given.
pub fn database_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }
    let mut candidates = Vec::new();
    if let Ok(path) = env::var(DATABASE_ENV) {
        if !path.trim().is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }
    if let Ok(current_dir) = env::current_dir() {
        candidates.push(current_dir.join("static").join(DATABASE_FILE_NAME));
    }
    candidates.push(
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../static")
            .join(DATABASE_FILE_NAME),
    );
    candidates
}

/// Loads the first database found, rejecting it eagerly if it is invalid.
pub fn discover_database<S>(explicit: Option<&Path>, service: &S) -> Result<StrategyDatabase>
where
    S: LocaleTextService + ?Sized,
{
    let candidates = database_candidates(explicit);
    for path in &candidates {
        if path.exists() {
            return StrategyDatabase::load(path, service);
        }
    }

    let searched = candidates
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(WeekdayError::DatabaseNotFound(searched))
}
