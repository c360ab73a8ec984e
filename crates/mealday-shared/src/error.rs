use thiserror::Error;

/// Errors raised by a [`Notifier`](crate::notifier::Notifier) implementation.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Post rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request signing failed: {0}")]
    Signing(String),
}

/// Errors raised while loading the flat JSON lookup files
/// (translation table, special days).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object at the top level of {0}")]
    NotAnObject(&'static str),
}
