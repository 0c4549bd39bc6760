use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::locale::LocaleId;
use crate::stripper::strip_direction;
use crate::text_service::{LocaleTextService, PhraseWidth};

/// Terse output drops the direction affix ("2 mo."); verbose keeps it ("in 2 months").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationStyle {
    #[default]
    Terse,
    Verbose,
}

impl FromStr for DurationStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terse" | "compact" => Ok(DurationStyle::Terse),
            "verbose" | "full" => Ok(DurationStyle::Verbose),
            other => Err(format!("unknown duration style {other:?}")),
        }
    }
}

impl fmt::Display for DurationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationStyle::Terse => f.write_str("terse"),
            DurationStyle::Verbose => f.write_str("verbose"),
        }
    }
}

/// Phrase widths requested from the text service for each style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationWidths {
    pub terse: PhraseWidth,
    pub verbose: PhraseWidth,
}

impl Default for DurationWidths {
    fn default() -> Self {
        Self {
            terse: PhraseWidth::Short,
            verbose: PhraseWidth::Long,
        }
    }
}

#[derive(Clone)]
pub struct RelativeDurationFormatter {
    service: Arc<dyn LocaleTextService>,
    widths: DurationWidths,
}

impl RelativeDurationFormatter {
    pub fn new(service: Arc<dyn LocaleTextService>) -> Self {
        Self::with_widths(service, DurationWidths::default())
    }

    pub fn with_widths(service: Arc<dyn LocaleTextService>, widths: DurationWidths) -> Self {
        Self { service, widths }
    }

    /// Describes `target` relative to `reference`. Magnitude and unit come
    /// from the text service.
    pub fn format(
        &self,
        target: DateTime<Utc>,
        reference: DateTime<Utc>,
        locale: &LocaleId,
        style: DurationStyle,
    ) -> Result<String> {
        let magnitude = self.service.relative_magnitude(target, reference);
        match style {
            DurationStyle::Verbose => {
                let signed = if target < reference {
                    -(magnitude.value.unsigned_abs() as f64)
                } else {
                    magnitude.value.unsigned_abs() as f64
                };
                self.service
                    .relative_time_phrase(locale, signed, magnitude.unit, self.widths.verbose)
            }
            DurationStyle::Terse => {
                let amount = magnitude.value.unsigned_abs() as f64;
                let future = self.service.relative_time_phrase(
                    locale,
                    amount,
                    magnitude.unit,
                    self.widths.terse,
                )?;
                let past = self.service.relative_time_phrase(
                    locale,
                    -amount,
                    magnitude.unit,
                    self.widths.terse,
                )?;
                Ok(strip_direction(&future, &past))
            }
        }
    }
}
