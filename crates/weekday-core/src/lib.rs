//! Adaptive weekday abbreviations and terse relative durations.
//!
//! Each locale gets the shortest weekday form whose seven tokens are still
//! unique (narrow labels, 2- or 3-grapheme truncations of the short labels,
//! or a curated override). The strategies are classified offline into a
//! [`StrategyDatabase`] and applied at runtime by [`WeekdayResolver`].

pub mod classify;
pub mod config;
pub mod database;
pub mod duration;
pub mod error;
pub mod format;
pub mod graphemes;
pub mod locale;
pub mod locale_data;
pub mod logging;
pub mod registry;
pub mod resolver;
pub mod strategy;
pub mod stripper;
pub mod text_service;

pub use classify::{
    BuildOutcome, CandidateOutcome, Classification, ClassificationCounts, ClassificationSet,
    ExclusionReason, assemble, build_database, classify_all, classify_candidate, classify_locale,
};
pub use config::{
    ConfigLoadResult, ConfigSource, RuntimeConfig, config_directory, config_path, load_config,
    load_config_from,
};
pub use database::{
    DATABASE_SCHEMA_VERSION, DatabaseFile, StrategyDatabase, StrategySummary, discover_database,
};
pub use duration::{DurationStyle, DurationWidths, RelativeDurationFormatter};
pub use error::{AmbiguityReport, AmbiguousLocale, DuplicateGroup, Result, WeekdayError};
pub use format::{FormatRequest, FormattedRelative, WeekdayFormatter, formatter_from_parts};
pub use locale::LocaleId;
pub use locale_data::{LocaleDataService, discover_locale_data};
pub use logging::{LoggingDestination, LoggingError, init_logging};
pub use registry::OverrideRegistry;
pub use resolver::{Lookup, LookupSource, WeekdayResolver};
pub use strategy::{Strategy, StrategyKind};
pub use stripper::strip_direction;
pub use text_service::{
    LocaleTextService, PhraseWidth, RelativeMagnitude, RelativeUnit, WeekdaySet, WeekdayWidth,
};
