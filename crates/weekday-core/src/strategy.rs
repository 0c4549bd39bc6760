use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WeekdayError};
use crate::graphemes;
use crate::locale::LocaleId;
use crate::text_service::{LocaleTextService, WeekdaySet, WeekdayWidth};

/// Grapheme widths the classifier tries after the narrow set.
pub const TRUNCATE_WIDTHS: [u8; 2] = [2, 3];

/// How the seven weekday tokens of a locale are derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// The locale's narrow labels as-is.
    Narrow,
    /// The first `graphemes` clusters of each short label.
    Truncate { graphemes: u8 },
    /// Curated literal tokens, Sunday first.
    Custom { tokens: [String; 7] },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrategyKind {
    Narrow,
    Truncate2,
    Truncate3,
    Custom,
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Narrow => StrategyKind::Narrow,
            Strategy::Truncate { graphemes: 2 } => StrategyKind::Truncate2,
            Strategy::Truncate { .. } => StrategyKind::Truncate3,
            Strategy::Custom { .. } => StrategyKind::Custom,
        }
    }

    /// Token for a single day (Sunday = 0). Only `Custom` avoids the service.
    pub fn token<S>(&self, service: &S, locale: &LocaleId, day: usize) -> Result<String>
    where
        S: LocaleTextService + ?Sized,
    {
        match self {
            Strategy::Narrow => service.weekday_label(locale, WeekdayWidth::Narrow, day),
            Strategy::Truncate { graphemes: width } => {
                let label = service.weekday_label(locale, WeekdayWidth::Short, day)?;
                Ok(graphemes::truncate(&label, usize::from(*width)).to_string())
            }
            Strategy::Custom { tokens } => tokens
                .get(day)
                .cloned()
                .ok_or(WeekdayError::InvalidDayIndex(day as u8)),
        }
    }

    /// All seven tokens, fetching each label set at most once.
    pub fn tokens<S>(&self, service: &S, locale: &LocaleId) -> Result<[String; 7]>
    where
        S: LocaleTextService + ?Sized,
    {
        match self {
            Strategy::Narrow => {
                let labels = service.weekday_labels(locale, WeekdayWidth::Narrow)?;
                Ok(labels.labels().clone())
            }
            Strategy::Truncate { graphemes: width } => {
                let labels = service.weekday_labels(locale, WeekdayWidth::Short)?;
                Ok(truncate_set(&labels, usize::from(*width)))
            }
            Strategy::Custom { tokens } => Ok(tokens.clone()),
        }
    }
}

pub fn truncate_set(labels: &WeekdaySet, width: usize) -> [String; 7] {
    labels
        .labels()
        .clone()
        .map(|label| graphemes::truncate(&label, width).to_string())
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Narrow => f.write_str("narrow"),
            Strategy::Truncate { graphemes } => write!(f, "truncate({graphemes})"),
            Strategy::Custom { tokens } => write!(f, "custom[{}]", tokens.join(",")),
        }
    }
}
