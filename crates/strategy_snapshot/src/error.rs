use std::io;

use thiserror::Error;
use weekday_core::WeekdayError;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("{0}")]
    Message(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Weekday(#[from] WeekdayError),
    #[error("classification worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SnapshotError {
    pub fn message<T: Into<String>>(message: T) -> Self {
        SnapshotError::Message(message.into())
    }
}
