use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::duration::DurationWidths;
use crate::locale::LocaleId;
use crate::text_service::PhraseWidth;

const CONFIG_DIR_NAME: &str = "adaptive-weekdays";
const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_LOCALE_ENV: &str = "WEEKDAY_DEFAULT_LOCALE";
const DEFAULT_LOCALE: &str = "en";
const DEFAULT_TIMEZONE: &str = "UTC";

/// Result returned by [`load_config`], capturing the source and any non-fatal issues.
#[derive(Debug, Clone)]
pub struct ConfigLoadResult {
    pub config: RuntimeConfig,
    pub warnings: Vec<String>,
    pub source: ConfigSource,
}

/// Indicates where the configuration was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// No usable `config.toml`; defaults were synthesized.
    Default,
    /// Configuration was read from `config.toml`.
    File,
}

/// Runtime settings for formatting. Values are kept as written and checked
/// by [`load_config`]; the typed accessors never fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "RuntimeConfig::default_locale_value")]
    pub default_locale: String,
    #[serde(default = "RuntimeConfig::default_timezone_value")]
    pub timezone: String,
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    #[serde(default)]
    pub locale_data_path: Option<PathBuf>,
    #[serde(default = "RuntimeConfig::default_terse_width")]
    pub terse_width: String,
    #[serde(default = "RuntimeConfig::default_verbose_width")]
    pub verbose_width: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_locale: Self::default_locale_value(),
            timezone: Self::default_timezone_value(),
            database_path: None,
            locale_data_path: None,
            terse_width: Self::default_terse_width(),
            verbose_width: Self::default_verbose_width(),
        }
    }
}

impl RuntimeConfig {
    fn default_locale_value() -> String {
        DEFAULT_LOCALE.to_string()
    }

    fn default_timezone_value() -> String {
        DEFAULT_TIMEZONE.to_string()
    }

    fn default_terse_width() -> String {
        PhraseWidth::Short.as_str().to_string()
    }

    fn default_verbose_width() -> String {
        PhraseWidth::Long.as_str().to_string()
    }

    pub fn default_locale(&self) -> LocaleId {
        LocaleId::parse(&self.default_locale).unwrap_or_else(|_| LocaleId::english())
    }

    pub fn timezone(&self) -> Tz {
        self.timezone.parse().unwrap_or(Tz::UTC)
    }

    pub fn duration_widths(&self) -> DurationWidths {
        let defaults = DurationWidths::default();
        DurationWidths {
            terse: self.terse_width.parse().unwrap_or(defaults.terse),
            verbose: self.verbose_width.parse().unwrap_or(defaults.verbose),
        }
    }
}

/// Directory containing `config.toml` and the `logs/` folder.
pub fn config_directory() -> PathBuf {
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

pub fn config_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

/// Load the configuration from the default location, then apply
/// `WEEKDAY_DEFAULT_LOCALE`. Never fails.
pub fn load_config() -> ConfigLoadResult {
    let mut result = load_config_from(&config_path());
    let override_value = env::var(DEFAULT_LOCALE_ENV).ok();
    apply_default_locale_override(
        &mut result.config,
        override_value.as_deref(),
        &mut result.warnings,
    );
    result
}

pub fn load_config_from(path: &Path) -> ConfigLoadResult {
    let mut warnings = Vec::new();

    if path.exists() {
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<RuntimeConfig>(&raw) {
                Ok(cfg) => {
                    let (cfg, mut sanitize_warnings) = sanitize_config(cfg);
                    warnings.append(&mut sanitize_warnings);
                    return ConfigLoadResult {
                        config: cfg,
                        warnings,
                        source: ConfigSource::File,
                    };
                }
                Err(err) => {
                    warnings.push(format!(
                        "Failed to parse {} as TOML: {}. Falling back to defaults.",
                        path.display(),
                        err
                    ));
                }
            },
            Err(err) => {
                warnings.push(format!(
                    "Failed to read {}: {}. Falling back to defaults.",
                    path.display(),
                    err
                ));
            }
        }
    }

    ConfigLoadResult {
        config: RuntimeConfig::default(),
        warnings,
        source: ConfigSource::Default,
    }
}

fn apply_default_locale_override(
    config: &mut RuntimeConfig,
    value: Option<&str>,
    warnings: &mut Vec<String>,
) {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return;
    };
    match LocaleId::parse(value) {
        Ok(id) => config.default_locale = id.to_string(),
        Err(_) => warnings.push(format!(
            "Ignoring {DEFAULT_LOCALE_ENV}={value:?}: not a locale identifier."
        )),
    }
}

fn sanitize_config(mut config: RuntimeConfig) -> (RuntimeConfig, Vec<String>) {
    let mut warnings = Vec::new();

    match LocaleId::parse(&config.default_locale) {
        Ok(id) => config.default_locale = id.to_string(),
        Err(_) => {
            warnings.push(format!(
                "Invalid default_locale {:?}. Resetting to {}.",
                config.default_locale, DEFAULT_LOCALE
            ));
            config.default_locale = RuntimeConfig::default_locale_value();
        }
    }

    if config.timezone.parse::<Tz>().is_err() {
        warnings.push(format!(
            "Unknown timezone {:?}. Resetting to {}.",
            config.timezone, DEFAULT_TIMEZONE
        ));
        config.timezone = RuntimeConfig::default_timezone_value();
    }

    match config.terse_width.parse::<PhraseWidth>() {
        Ok(width) => config.terse_width = width.as_str().to_string(),
        Err(err) => {
            warnings.push(format!("terse_width: {err}. Resetting to short."));
            config.terse_width = RuntimeConfig::default_terse_width();
        }
    }

    match config.verbose_width.parse::<PhraseWidth>() {
        Ok(width) => config.verbose_width = width.as_str().to_string(),
        Err(err) => {
            warnings.push(format!("verbose_width: {err}. Resetting to long."));
            config.verbose_width = RuntimeConfig::default_verbose_width();
        }
    }

    for (key, path) in [
        ("database_path", &mut config.database_path),
        ("locale_data_path", &mut config.locale_data_path),
    ] {
        if path
            .as_ref()
            .is_some_and(|value| value.as_os_str().is_empty())
        {
            warnings.push(format!("{key} is empty; ignoring it."));
            *path = None;
        }
    }

    (config, warnings)
}
