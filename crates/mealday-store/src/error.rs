use std::path::PathBuf;

use mealday_shared::NotifyError;
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A file or directory could not be read, written or listed.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A message file does not contain valid UTF-8.
    #[error("File is not valid UTF-8: {}", path.display())]
    Encoding { path: PathBuf },

    /// A log file could not be parsed or serialized.
    #[error("JSON error at {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A year/week directory pair that does not name an ISO week.
    #[error("Invalid calendar week: {year}/{week}")]
    InvalidWeek { year: String, week: String },

    /// The outbound post failed; nothing was logged.
    #[error("Notifier error: {0}")]
    Notify(#[from] NotifyError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
