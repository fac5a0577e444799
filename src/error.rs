//! Error types for the mood journal.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or parsing model values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("mood level must be between 1 and 5, got {0}")]
    InvalidLevel(i64),

    #[error("mood level must be a number between 1 and 5, got {0:?}")]
    UnparsableLevel(String),

    #[error("unknown time of day: {0:?}")]
    InvalidTimeOfDay(String),

    #[error("invalid date {0:?}, expected yyyy-MM-dd")]
    InvalidDate(String),

    #[error("unknown goal kind: {0:?}")]
    InvalidGoalKind(String),
}

/// Errors raised by a [`MoodRepository`](crate::store::MoodRepository).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse mood data in {path}: {source}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize mood data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("mood store lock poisoned")]
    Poisoned,
}
