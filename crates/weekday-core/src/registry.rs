//! Curated weekday tokens for locales that no automatic strategy resolves.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::{Result, WeekdayError};
use crate::graphemes;
use crate::locale::LocaleId;

const BUILTIN_OVERRIDES: [(&str, [&str; 7]); 14] = [
    ("gv", ["Jed", "Jel", "Jem", "Jrc", "Jrd", "Jeh", "Jes"]),
    ("mg", ["Alh", "Alt", "Tal", "Alr", "Alk", "Zom", "Asb"]),
    ("my", ["တနဂ", "တနလ", "အင်", "ဗုဒ", "ကြာ", "သော", "စနေ"]),
    ("oc", ["dimg", "dilu", "dima", "dimc", "dijò", "divn", "diss"]),
    ("oc-FR", ["dimg", "dilu", "dima", "dimc", "dijò", "divn", "diss"]),
    ("oc-ES", ["dimg", "dilu", "dima", "dimc", "dijò", "divn", "diss"]),
    ("sw", ["Jpl", "Jtt", "Jnn", "Jtn", "Alh", "Iju", "Jms"]),
    ("ur", ["اتو", "پیر", "منگ", "بدھ", "جمر", "جمع", "ہفت"]),
    ("ur-IN", ["اتو", "پیر", "منگ", "بدھ", "جمر", "جمع", "ہفت"]),
    ("ur-PK", ["اتو", "پیر", "منگ", "بدھ", "جمر", "جمع", "ہفت"]),
    ("pa-PK", ["اتو", "پیر", "منگ", "بُد", "جمر", "جمع", "ہفت"]),
    ("yo", ["Àìk", "Aj", "Ìsẹ", "Ọjr", "Ọjb", "Ẹt", "Àbm"]),
    ("za", ["ngo", "sit", "ngh", "sam", "seq", "haj", "rok"]),
    ("za-CN", ["ngo", "sit", "ngh", "sam", "seq", "haj", "rok"]),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideRegistry {
    entries: BTreeMap<LocaleId, [String; 7]>,
}

impl OverrideRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The curated table shipped with the crate.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for (locale, tokens) in BUILTIN_OVERRIDES {
            let id = LocaleId::parse(locale).expect("builtin override locales are well formed");
            registry.entries.insert(id, tokens.map(String::from));
        }
        registry
    }

    /// Adds or replaces one entry after checking its tokens.
    pub fn insert(&mut self, locale: &str, tokens: [String; 7]) -> Result<Option<[String; 7]>> {
        let id = LocaleId::parse(locale).map_err(|_| WeekdayError::InvalidOverride {
            locale: locale.to_string(),
            reason: "not a locale identifier".to_string(),
        })?;
        validate_tokens(id.as_str(), &tokens)?;
        Ok(self.entries.insert(id, tokens))
    }

    /// Layers entries from a JSON file (`{"locale": [7 tokens]}`) over this registry.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize> {
        if !path.exists() {
            return Ok(0);
        }
        let raw = fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(0);
        }

        let parsed: HashMap<String, Vec<String>> = serde_json::from_str(&raw)?;
        let mut added = 0;
        for (locale, tokens) in parsed {
            let len = tokens.len();
            let tokens: [String; 7] =
                tokens
                    .try_into()
                    .map_err(|_| WeekdayError::InvalidOverride {
                        locale: locale.clone(),
                        reason: format!("expected 7 tokens, found {len}"),
                    })?;
            self.insert(&locale, tokens)?;
            added += 1;
        }
        Ok(added)
    }

    pub fn get(&self, locale: &LocaleId) -> Option<&[String; 7]> {
        self.entries.get(locale)
    }

    pub fn contains(&self, locale: &LocaleId) -> bool {
        self.entries.contains_key(locale)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LocaleId, &[String; 7])> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-checks every entry; used before a build writes anything.
    pub fn validate(&self) -> Result<()> {
        for (locale, tokens) in &self.entries {
            validate_tokens(locale.as_str(), tokens)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_tokens(locale: &str, tokens: &[String; 7]) -> Result<()> {
    if let Some(day) = tokens.iter().position(|token| token.trim().is_empty()) {
        return Err(WeekdayError::InvalidOverride {
            locale: locale.to_string(),
            reason: format!("token for day {day} is empty"),
        });
    }
    if !graphemes::all_distinct(tokens) {
        let groups = graphemes::duplicates(tokens);
        let described = groups
            .iter()
            .map(|group| format!("{:?} on days {:?}", group.token, group.days))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(WeekdayError::InvalidOverride {
            locale: locale.to_string(),
            reason: format!("tokens are not distinct: {described}"),
        });
    }
    Ok(())
}
