use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Recoverable failures. None of these reach the user as anything worse than
/// a status-line message.
#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no epic with id {0}")]
    UnknownEpic(Uuid),
    #[error("no sprint with id {0}")]
    UnknownSprint(Uuid),
    #[error("start {start} is after end {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    #[error("could not resolve a configuration directory")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, TimelineError>;
