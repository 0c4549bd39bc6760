use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;
use weekday_core::LocaleDataService;

use crate::error::SnapshotError;

/// Reads one id per line. Blank lines and `#` comments are skipped and
/// repeated ids keep their first position.
pub fn load_candidates(path: &Path) -> Result<Vec<String>, SnapshotError> {
    let raw = fs::read_to_string(path)?;
    let candidates = parse_candidates(&raw);
    if candidates.is_empty() {
        return Err(SnapshotError::message(format!(
            "candidate list {} has no entries",
            path.display()
        )));
    }
    debug!(path = %path.display(), count = candidates.len(), "candidate list loaded");
    Ok(candidates)
}

pub fn parse_candidates(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(line.to_string()))
        .map(str::to_string)
        .collect()
}

/// Candidate list from a file when given, otherwise every id the locale data knows.
pub fn candidates_for(
    path: Option<&Path>,
    service: &LocaleDataService,
) -> Result<Vec<String>, SnapshotError> {
    match path {
        Some(path) => load_candidates(path),
        None => Ok(service.known_ids()),
    }
}
