use std::env;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;

use clap::Parser;

use crate::error::SnapshotError;

pub const WORKERS_ENV: &str = "STRATEGY_WORKERS";
pub const CHUNK_SIZE_ENV: &str = "STRATEGY_CHUNK_SIZE";
const DEFAULT_CHUNK_SIZE: usize = 64;

/// CLI surface for the strategy database generator.
#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version,
    about = "Classify locales and write the weekday strategy database"
)]
pub struct CliArgs {
    /// Output path for the strategy database JSON.
    #[arg(
        long = "out",
        value_name = "FILE",
        default_value = "static/weekday_strategy.json"
    )]
    pub out: PathBuf,

    /// Locale data dump used as the text service.
    #[arg(
        long = "locale-data",
        value_name = "FILE",
        default_value = "static/locale_data.json"
    )]
    pub locale_data: PathBuf,

    /// Candidate ids, one per line. Defaults to every id in the locale data.
    #[arg(long = "candidates", value_name = "FILE")]
    pub candidates: Option<PathBuf>,

    /// Extra overrides as `{"locale": [7 tokens]}`, layered over the builtin table.
    #[arg(long = "overrides", value_name = "FILE")]
    pub overrides: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tunables {
    pub workers: usize,
    pub chunk_size: usize,
}

#[derive(Debug, Clone)]
pub struct Paths {
    pub database: PathBuf,
    pub locale_data: PathBuf,
    pub candidates: Option<PathBuf>,
    pub overrides: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub paths: Paths,
    pub tunables: Tunables,
}

impl CliArgs {
    pub fn resolve(self) -> Result<AppConfig, SnapshotError> {
        let database = resolve_path(&self.out);
        let locale_data = resolve_path(&self.locale_data);
        let candidates = self.candidates.as_deref().map(resolve_path);
        let overrides = self.overrides.as_deref().map(resolve_path);

        ensure_parent_directory(&database)?;

        if !locale_data.exists() {
            return Err(SnapshotError::Config(format!(
                "locale data {} does not exist",
                locale_data.display()
            )));
        }
        for (label, path) in [("candidate list", &candidates), ("override file", &overrides)] {
            if let Some(path) = path.as_ref().filter(|path| !path.exists()) {
                return Err(SnapshotError::Config(format!(
                    "{label} {} does not exist",
                    path.display()
                )));
            }
        }

        let tunables = Tunables::from_env()?;

        Ok(AppConfig {
            paths: Paths {
                database,
                locale_data,
                candidates,
                overrides,
            },
            tunables,
        })
    }
}

impl Tunables {
    pub fn from_env() -> Result<Self, SnapshotError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, SnapshotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let workers = parse_positive(WORKERS_ENV, lookup(WORKERS_ENV), default_workers)?;
        let chunk_size = parse_positive(CHUNK_SIZE_ENV, lookup(CHUNK_SIZE_ENV), DEFAULT_CHUNK_SIZE)?;
        Ok(Self {
            workers,
            chunk_size,
        })
    }
}

fn parse_positive(var: &str, raw: Option<String>, default: usize) -> Result<usize, SnapshotError> {
    match raw {
        Some(value) => match value.trim().parse::<usize>() {
            Ok(0) => Err(SnapshotError::Config(format!(
                "invalid value for {var}: must be at least 1"
            ))),
            Ok(parsed) => Ok(parsed),
            Err(err) => Err(SnapshotError::Config(format!(
                "invalid value for {}: {}",
                var, err
            ))),
        },
        None => Ok(default),
    }
}

fn resolve_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace_root().join(path)
    }
}

fn ensure_parent_directory(path: &Path) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(values: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = values
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |var| values.get(var).cloned()
    }

    #[test]
    fn tunables_default_when_unset() {
        let tunables = Tunables::from_lookup(lookup(&[])).unwrap();
        assert!(tunables.workers >= 1);
        assert_eq!(tunables.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn tunables_read_overrides() {
        let tunables = Tunables::from_lookup(lookup(&[
            (WORKERS_ENV, "3"),
            (CHUNK_SIZE_ENV, " 16 "),
        ]))
        .unwrap();
        assert_eq!(
            tunables,
            Tunables {
                workers: 3,
                chunk_size: 16
            }
        );
    }

    #[test]
    fn tunables_reject_zero_and_garbage() {
        let zero = Tunables::from_lookup(lookup(&[(WORKERS_ENV, "0")])).unwrap_err();
        assert!(zero.to_string().contains(WORKERS_ENV));

        let garbage = Tunables::from_lookup(lookup(&[(CHUNK_SIZE_ENV, "many")])).unwrap_err();
        assert!(matches!(garbage, SnapshotError::Config(_)));
    }

    #[test]
    fn relative_paths_land_under_the_workspace() {
        let resolved = resolve_path(Path::new("static/weekday_strategy.json"));
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("static/weekday_strategy.json"));
        assert_eq!(
            resolve_path(Path::new("/tmp/out.json")),
            PathBuf::from("/tmp/out.json")
        );
    }

    #[test]
    fn missing_locale_data_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = CliArgs {
            out: dir.path().join("out.json"),
            locale_data: dir.path().join("missing.json"),
            candidates: None,
            overrides: None,
        };
        assert!(matches!(cli.resolve(), Err(SnapshotError::Config(_))));
    }
}
