use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::WeekdayError;

/// A normalized `language[-Script][-REGION]` identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocaleId(String);

fn locale_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z]{2,3})(?:[-_]([A-Za-z]{4}))?(?:[-_]([A-Za-z]{2}|[0-9]{3}))?$")
            .expect("static locale pattern")
    })
}

impl LocaleId {
    pub fn parse(raw: &str) -> Result<Self, WeekdayError> {
        let trimmed = raw.trim();
        let captures = locale_pattern()
            .captures(trimmed)
            .ok_or_else(|| WeekdayError::InvalidLocale(raw.to_string()))?;

        let mut normalized = captures[1].to_ascii_lowercase();
        if let Some(script) = captures.get(2) {
            let script = script.as_str();
            normalized.push('-');
            normalized.push_str(&script[..1].to_ascii_uppercase());
            normalized.push_str(&script[1..].to_ascii_lowercase());
        }
        if let Some(region) = captures.get(3) {
            normalized.push('-');
            normalized.push_str(&region.as_str().to_ascii_uppercase());
        }

        Ok(Self(normalized))
    }

    /// `en`, the fallback when no usable default locale is configured.
    pub fn english() -> Self {
        Self("en".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary language subtag, e.g. `pa` for `pa-Arab-PK`.
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    pub fn has_subtags(&self) -> bool {
        self.0.contains('-')
    }

    /// The language-only identifier for this locale.
    pub fn language_only(&self) -> LocaleId {
        LocaleId(self.language().to_string())
    }
}

/// Primary language subtag of a raw, possibly unnormalized identifier.
pub fn requested_language(raw: &str) -> String {
    raw.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocaleId {
    type Err = WeekdayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocaleId::parse(s)
    }
}

impl AsRef<str> for LocaleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for LocaleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for LocaleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        LocaleId::parse(&raw).map_err(serde::de::Error::custom)
    }
}
