use std::fmt;
use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeekdayError {
    #[error("invalid locale identifier: {0:?}")]
    InvalidLocale(String),
    #[error("day index {0} is outside 0..=6")]
    InvalidDayIndex(u8),
    #[error("text service error: {0}")]
    TextService(String),
    #[error("invalid override for {locale}: {reason}")]
    InvalidOverride { locale: String, reason: String },
    #[error("unsupported database schema version {found}; expected {expected}")]
    SchemaVersion { expected: u32, found: u32 },
    #[error("invalid database entry for {locale}: {reason}")]
    InvalidDatabase { locale: String, reason: String },
    #[error("{0}")]
    UnresolvedAmbiguity(AmbiguityReport),
    #[error("no strategy database found (searched: {0})")]
    DatabaseNotFound(String),
    #[error("default locale {0} is not present in the strategy database")]
    MissingDefaultLocale(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WeekdayError {
    pub fn text_service<T: Into<String>>(message: T) -> Self {
        WeekdayError::TextService(message.into())
    }

    pub fn invalid_database(locale: impl Into<String>, reason: impl Into<String>) -> Self {
        WeekdayError::InvalidDatabase {
            locale: locale.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WeekdayError>;

/// Locales that no automatic strategy made distinct and that have no override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbiguityReport {
    pub locales: Vec<AmbiguousLocale>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousLocale {
    pub canonical: String,
    pub requested: String,
    pub narrow: Vec<String>,
    pub short: Vec<String>,
    /// Collisions remaining after 3-grapheme truncation of the short set.
    pub collisions: Vec<DuplicateGroup>,
}

/// One token shared by several days (Sunday = 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub token: String,
    pub days: Vec<usize>,
}

impl AmbiguityReport {
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    pub fn canonical_ids(&self) -> Vec<&str> {
        self.locales
            .iter()
            .map(|entry| entry.canonical.as_str())
            .collect()
    }
}

impl fmt::Display for AmbiguityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} locale(s) have no distinct weekday strategy and no override:",
            self.locales.len()
        )?;
        for entry in &self.locales {
            write!(f, "\n  {} (requested {})", entry.canonical, entry.requested)?;
            for group in &entry.collisions {
                let days = group
                    .days
                    .iter()
                    .map(|day| DAY_NAMES[*day % 7])
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "; {:?} -> {}", group.token, days)?;
            }
        }
        Ok(())
    }
}

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
