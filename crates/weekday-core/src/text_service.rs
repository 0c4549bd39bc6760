//! The locale text service boundary.
//!
//! Everything locale-specific (canonical ids, weekday names, relative-time
//! phrases, how a time delta maps to a value and unit) comes from an
//! implementation of [`LocaleTextService`]. The rest of the crate only works
//! on the strings it returns.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WeekdayError};
use crate::locale::LocaleId;

/// Weekday label width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayWidth {
    Narrow,
    Short,
}

/// Width of a relative-time phrase ("in 2 months" / "in 2 mo." / "in 2mo").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhraseWidth {
    Long,
    Short,
    Narrow,
}

impl PhraseWidth {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhraseWidth::Long => "long",
            PhraseWidth::Short => "short",
            PhraseWidth::Narrow => "narrow",
        }
    }
}

impl FromStr for PhraseWidth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(PhraseWidth::Long),
            "short" => Ok(PhraseWidth::Short),
            "narrow" => Ok(PhraseWidth::Narrow),
            other => Err(format!("unknown phrase width {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelativeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl fmt::Display for RelativeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelativeUnit::Second => "second",
            RelativeUnit::Minute => "minute",
            RelativeUnit::Hour => "hour",
            RelativeUnit::Day => "day",
            RelativeUnit::Week => "week",
            RelativeUnit::Month => "month",
            RelativeUnit::Year => "year",
        };
        f.write_str(name)
    }
}

/// A signed amount in one unit. Negative values lie in the past.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeMagnitude {
    pub value: i64,
    pub unit: RelativeUnit,
}

/// Seven labels, Sunday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct WeekdaySet([String; 7]);

impl WeekdaySet {
    pub fn new(labels: [String; 7]) -> Self {
        Self(labels)
    }

    pub fn get(&self, day: usize) -> Option<&str> {
        self.0.get(day).map(String::as_str)
    }

    pub fn labels(&self) -> &[String; 7] {
        &self.0
    }
}

impl TryFrom<Vec<String>> for WeekdaySet {
    type Error = String;

    fn try_from(value: Vec<String>) -> std::result::Result<Self, Self::Error> {
        let len = value.len();
        let labels: [String; 7] = value
            .try_into()
            .map_err(|_| format!("expected 7 weekday labels, found {len}"))?;
        Ok(Self(labels))
    }
}

impl From<WeekdaySet> for Vec<String> {
    fn from(value: WeekdaySet) -> Self {
        value.0.into()
    }
}

/// Source of locale-correct strings.
///
/// Implementations must be usable from many threads at once; classification
/// calls them from a worker pool and the runtime path shares one instance.
pub trait LocaleTextService: Send + Sync {
    /// Canonical locale for a requested id, or `None` when unsupported.
    fn resolve_locale(&self, requested: &str) -> Option<LocaleId>;

    fn weekday_labels(&self, locale: &LocaleId, width: WeekdayWidth) -> Result<WeekdaySet>;

    /// Phrase for `signed_value` units. A negative value (including `-0.0`)
    /// is rendered in the past direction.
    fn relative_time_phrase(
        &self,
        locale: &LocaleId,
        signed_value: f64,
        unit: RelativeUnit,
        width: PhraseWidth,
    ) -> Result<String>;

    /// Picks the value and unit used to describe `target` relative to `reference`.
    fn relative_magnitude(
        &self,
        target: DateTime<Utc>,
        reference: DateTime<Utc>,
    ) -> RelativeMagnitude;

    fn weekday_label(&self, locale: &LocaleId, width: WeekdayWidth, day: usize) -> Result<String> {
        let labels = self.weekday_labels(locale, width)?;
        labels.get(day).map(str::to_string).ok_or_else(|| {
            WeekdayError::text_service(format!("{locale} has no weekday label for day {day}"))
        })
    }
}
