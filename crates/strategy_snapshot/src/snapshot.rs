use std::fs;
use std::path::{Path, PathBuf};

use weekday_core::{DatabaseFile, StrategyDatabase};

use crate::error::SnapshotError;

/// Writes the database next to its destination, then renames it into place.
pub fn write_database(
    path: &Path,
    database: &StrategyDatabase,
) -> Result<DatabaseFile, SnapshotError> {
    let file = database.to_file();
    let serialized = serde_json::to_string_pretty(&file)?;
    let temp_path = build_temp_path(path);
    fs::write(&temp_path, format!("{serialized}\n"))?;
    fs::rename(&temp_path, path)?;
    Ok(file)
}

fn build_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => {
            temp_path.set_extension(format!("{ext}.tmp"));
        }
        _ => {
            temp_path.set_extension("tmp");
        }
    }
    temp_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_keeps_the_extension() {
        assert_eq!(
            build_temp_path(Path::new("static/weekday_strategy.json")),
            PathBuf::from("static/weekday_strategy.json.tmp")
        );
        assert_eq!(
            build_temp_path(Path::new("static/database")),
            PathBuf::from("static/database.tmp")
        );
    }

    #[test]
    fn replaces_existing_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weekday_strategy.json");
        fs::write(&path, "stale").unwrap();

        let file = write_database(&path, &StrategyDatabase::default()).unwrap();
        assert_eq!(file.strategies.len(), 0);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("}\n"));
        assert!(written.contains("\"schema_version\": 1"));
        assert!(!build_temp_path(&path).exists());
    }
}
