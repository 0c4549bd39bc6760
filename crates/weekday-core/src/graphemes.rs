//! Grapheme-cluster helpers shared by classification, resolution, and the
//! affix stripper.

use std::collections::{BTreeMap, HashSet};

use unicode_segmentation::UnicodeSegmentation;

use crate::error::DuplicateGroup;

/// Returns the prefix of `value` holding at most `count` extended grapheme
/// clusters. Strings already that short are returned whole.
pub fn truncate(value: &str, count: usize) -> &str {
    match value.grapheme_indices(true).nth(count) {
        Some((offset, _)) => &value[..offset],
        None => value,
    }
}

pub fn split(value: &str) -> Vec<&str> {
    value.graphemes(true).collect()
}

/// True when no two tokens are the same grapheme sequence.
///
/// Two strings hold equal grapheme sequences exactly when they are equal as
/// strings, so a set over the (already truncated) tokens is sufficient.
pub fn all_distinct<S: AsRef<str>>(tokens: &[S]) -> bool {
    let mut seen = HashSet::with_capacity(tokens.len());
    tokens.iter().all(|token| seen.insert(token.as_ref()))
}

/// Groups of positions sharing a token, ordered by token.
pub fn duplicates<S: AsRef<str>>(tokens: &[S]) -> Vec<DuplicateGroup> {
    let mut positions: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, token) in tokens.iter().enumerate() {
        positions.entry(token.as_ref()).or_default().push(index);
    }

    positions
        .into_iter()
        .filter(|(_, days)| days.len() > 1)
        .map(|(token, days)| DuplicateGroup {
            token: token.to_string(),
            days,
        })
        .collect()
}
