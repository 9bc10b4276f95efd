//! Error types for the notes service.

use thiserror::Error;

use crate::validation::ValidationIssue;

/// Result type alias using the notes service Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notes service operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Note not found
    #[error("Note not found: {0}")]
    NoteNotFound(i64),

    /// One or more request fields failed validation
    #[error("Validation failed: {}", format_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// Forbidden (identified but not authorized)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a validation error for a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Error::Validation(vec![ValidationIssue::new(field, message)])
    }

    /// True when the caller caused the failure rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::NoteNotFound(_) | Error::Validation(_) | Error::Forbidden(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}
