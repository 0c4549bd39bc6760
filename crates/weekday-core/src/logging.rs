use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;

use thiserror::Error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::time::{LocalTime, UtcTime};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::config_directory;

pub const LOG_FILTER_ENV: &str = "WEEKDAY_LOG";
const LOG_FILE_NAME: &str = "adaptive-weekdays.log";

/// Controls where structured logs are published.
#[derive(Debug, Clone, Copy)]
pub enum LoggingDestination {
    /// JSON to the log file plus human-readable lines on stderr.
    FileAndStderr,
    FileOnly,
    /// Stderr only; used by the snapshot build and tests.
    StderrOnly,
}

#[derive(Debug)]
struct LoggingGuards {
    _guard: Option<WorkerGuard>,
    log_path: Option<PathBuf>,
}

static LOGGING_STATE: OnceLock<LoggingGuards> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to prepare log directory: {0}")]
    Io(#[from] io::Error),
    #[error("invalid logging filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to install logging subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber. The first call wins; later calls return
/// the log file chosen by the first.
pub fn init_logging(
    destination: LoggingDestination,
) -> Result<Option<&'static PathBuf>, LoggingError> {
    if LOGGING_STATE.get().is_none() {
        let guards = install_logging(destination)?;
        if let Err(guards) = LOGGING_STATE.set(guards) {
            drop(guards);
        }
    }

    Ok(current_log_path())
}

pub fn current_log_path() -> Option<&'static PathBuf> {
    LOGGING_STATE
        .get()
        .and_then(|guards| guards.log_path.as_ref())
}

fn install_logging(destination: LoggingDestination) -> Result<LoggingGuards, LoggingError> {
    let filter = build_filter(env::var(LOG_FILTER_ENV).ok().as_deref())?;
    let registry = tracing_subscriber::registry().with(filter);

    let (file_layer, guard, log_path) = match destination {
        LoggingDestination::FileAndStderr | LoggingDestination::FileOnly => {
            let dir = config_directory().join("logs");
            fs::create_dir_all(&dir)?;
            let path = dir.join(LOG_FILE_NAME);
            let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
            let (writer, worker_guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .event_format(
                    tracing_subscriber::fmt::format()
                        .json()
                        .with_timer(UtcTime::rfc_3339())
                        .with_level(true)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with_writer(writer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(worker_guard), Some(path))
        }
        LoggingDestination::StderrOnly => (None, None, None),
    };

    let stderr_layer = match destination {
        LoggingDestination::FileOnly => None,
        _ => Some(
            tracing_subscriber::fmt::layer()
                .event_format(
                    tracing_subscriber::fmt::format()
                        .with_timer(LocalTime::rfc_3339())
                        .with_level(true)
                        .with_target(true)
                        .with_ansi(false),
                )
                .with_writer(io::stderr)
                .with_ansi(false)
                .boxed(),
        ),
    };

    registry.with(file_layer).with(stderr_layer).try_init()?;

    if let Some(path) = log_path.as_ref() {
        info!(path = %path.display(), "Structured logging enabled");
    }

    Ok(LoggingGuards {
        _guard: guard,
        log_path,
    })
}

/// `WEEKDAY_LOG` when set, then `RUST_LOG`, then `info`.
fn build_filter(explicit: Option<&str>) -> Result<EnvFilter, ParseError> {
    if let Some(spec) = explicit {
        if !spec.trim().is_empty() {
            return EnvFilter::try_new(spec);
        }
    }

    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new("info"),
    }
}
