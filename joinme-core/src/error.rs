//! Error types for JoinMe.

use thiserror::Error;

/// Errors that can occur in JoinMe operations.
#[derive(Error, Debug)]
pub enum JoinMeError {
    #[error("{collection} '{id}' not found")]
    NotFound { collection: &'static str, id: String },

    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("Remote store request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid deep link '{0}'")]
    InvalidDeepLink(String),

    #[error("Event '{0}' is full")]
    EventFull(String),

    #[error("User '{user}' already participates in '{id}'")]
    AlreadyParticipant { id: String, user: String },

    #[error("User '{user}' is not part of '{id}'")]
    NotParticipant { id: String, user: String },

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JoinMeError {
    pub fn not_found(collection: &'static str, id: &str) -> Self {
        JoinMeError::NotFound {
            collection,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, JoinMeError::NotFound { .. })
    }
}

impl From<serde_json::Error> for JoinMeError {
    fn from(e: serde_json::Error) -> Self {
        JoinMeError::Serialization(e.to_string())
    }
}

/// Result type alias for JoinMe operations.
pub type JoinMeResult<T> = Result<T, JoinMeError>;
