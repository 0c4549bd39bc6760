use std::sync::Arc;

use tracing::trace;

use crate::database::StrategyDatabase;
use crate::error::{Result, WeekdayError};
use crate::locale::LocaleId;
use crate::strategy::Strategy;
use crate::text_service::LocaleTextService;

/// Which database key answered a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    Exact,
    Language,
    Default,
}

/// The database entry chosen for a requested id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup<'a> {
    pub key: LocaleId,
    pub source: LookupSource,
    pub strategy: &'a Strategy,
}

/// Runtime weekday abbreviation lookup over a loaded [`StrategyDatabase`].
#[derive(Clone)]
pub struct WeekdayResolver {
    database: Arc<StrategyDatabase>,
    service: Arc<dyn LocaleTextService>,
    default_locale: LocaleId,
    default_strategy: Strategy,
}

impl WeekdayResolver {
    /// `default_locale` goes through the same exact then language-only match
    /// as requests (`en-US` lands on `en`). Fails only when neither key has a
    /// database entry.
    pub fn new(
        database: Arc<StrategyDatabase>,
        service: Arc<dyn LocaleTextService>,
        default_locale: LocaleId,
    ) -> Result<Self> {
        let Some((key, strategy)) = find_entry(&database, &default_locale) else {
            return Err(WeekdayError::MissingDefaultLocale(
                default_locale.to_string(),
            ));
        };
        let default_strategy = strategy.clone();
        Ok(Self {
            database,
            service,
            default_locale: key,
            default_strategy,
        })
    }

    pub fn database(&self) -> &StrategyDatabase {
        &self.database
    }

    pub fn service(&self) -> &dyn LocaleTextService {
        self.service.as_ref()
    }

    /// The database key requests fall back to.
    pub fn default_locale(&self) -> &LocaleId {
        &self.default_locale
    }

    /// Database entry used for `requested`: exact, language-only, then default.
    pub fn lookup(&self, requested: &str) -> Lookup<'_> {
        if let Ok(id) = LocaleId::parse(requested) {
            if let Some((key, strategy)) = find_entry(&self.database, &id) {
                let source = if key == id {
                    LookupSource::Exact
                } else {
                    LookupSource::Language
                };
                return Lookup {
                    key,
                    source,
                    strategy,
                };
            }
        }
        Lookup {
            key: self.default_locale.clone(),
            source: LookupSource::Default,
            strategy: &self.default_strategy,
        }
    }

    /// Abbreviation for `day` (Sunday = 0) in `locale`.
    pub fn resolve(&self, locale: &str, day: u8) -> Result<String> {
        if day > 6 {
            return Err(WeekdayError::InvalidDayIndex(day));
        }
        let found = self.lookup(locale);
        trace!(
            requested = locale,
            key = %found.key,
            source = ?found.source,
            strategy = %found.strategy,
            day,
            "resolving weekday"
        );
        found
            .strategy
            .token(self.service.as_ref(), &found.key, usize::from(day))
    }

    /// All seven abbreviations, Sunday first.
    pub fn resolve_week(&self, locale: &str) -> Result<[String; 7]> {
        let found = self.lookup(locale);
        found.strategy.tokens(self.service.as_ref(), &found.key)
    }
}

fn find_entry<'a>(
    database: &'a StrategyDatabase,
    id: &LocaleId,
) -> Option<(LocaleId, &'a Strategy)> {
    if let Some(strategy) = database.get(id) {
        return Some((id.clone(), strategy));
    }
    let language = id.language_only();
    database.get(&language).map(|strategy| (language, strategy))
}
