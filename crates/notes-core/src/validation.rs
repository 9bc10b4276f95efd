//! Request validation for note fields and pagination.
//!
//! Length limits are checked against the raw value; the blank check runs
//! on the trimmed value. Titles are stored trimmed, content as given.

use serde::{Deserialize, Serialize};

use crate::defaults::{CONTENT_MAX_CHARS, PAGE_LIMIT, PAGE_LIMIT_MAX, PAGE_OFFSET, TITLE_MAX_CHARS};
use crate::error::{Error, Result};
use crate::models::{CreateNoteRequest, ListNotesRequest, UpdateNoteRequest};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn check_text(
    field: &str,
    label: &str,
    raw: &str,
    max_chars: usize,
) -> std::result::Result<(), ValidationIssue> {
    let len = raw.chars().count();
    if len == 0 {
        return Err(ValidationIssue::new(
            field,
            "String should have at least 1 character",
        ));
    }
    if len > max_chars {
        return Err(ValidationIssue::new(
            field,
            format!("String should have at most {} characters", max_chars),
        ));
    }
    if raw.trim().is_empty() {
        return Err(ValidationIssue::new(
            field,
            format!("{} must not be blank", label),
        ));
    }
    Ok(())
}

/// Validate a title and return the value to store (trimmed).
pub fn validate_title(raw: &str) -> Result<String> {
    check_text("title", "Title", raw, TITLE_MAX_CHARS)
        .map(|_| raw.trim().to_string())
        .map_err(|issue| Error::Validation(vec![issue]))
}

/// Validate content and return the value to store (unchanged).
pub fn validate_content(raw: &str) -> Result<String> {
    check_text("content", "Content", raw, CONTENT_MAX_CHARS)
        .map(|_| raw.to_string())
        .map_err(|issue| Error::Validation(vec![issue]))
}

/// Resolve optional pagination parameters against defaults and bounds.
pub fn validate_pagination(limit: Option<i64>, offset: Option<i64>) -> Result<ListNotesRequest> {
    let limit = limit.unwrap_or(PAGE_LIMIT);
    let offset = offset.unwrap_or(PAGE_OFFSET);
    let mut issues = Vec::new();

    if !(1..=PAGE_LIMIT_MAX).contains(&limit) {
        issues.push(ValidationIssue::new(
            "limit",
            format!("limit must be between 1 and {}", PAGE_LIMIT_MAX),
        ));
    }
    if offset < 0 {
        issues.push(ValidationIssue::new("offset", "offset must be >= 0"));
    }

    if issues.is_empty() {
        Ok(ListNotesRequest { limit, offset })
    } else {
        Err(Error::Validation(issues))
    }
}

/// Merge a per-field check into an issue list, returning the accepted value.
fn collect(issues: &mut Vec<ValidationIssue>, result: Result<String>) -> Option<String> {
    match result {
        Ok(value) => Some(value),
        Err(Error::Validation(mut found)) => {
            issues.append(&mut found);
            None
        }
        Err(other) => {
            issues.push(ValidationIssue::new("body", other.to_string()));
            None
        }
    }
}

impl CreateNoteRequest {
    /// Validate every field, reporting all failures at once.
    pub fn validate(self) -> Result<Self> {
        let mut issues = Vec::new();
        let title = collect(&mut issues, validate_title(&self.title));
        let content = collect(&mut issues, validate_content(&self.content));

        match (title, content) {
            (Some(title), Some(content)) if issues.is_empty() => Ok(Self {
                title,
                content,
                reason: self.reason,
            }),
            _ => Err(Error::Validation(issues)),
        }
    }
}

impl UpdateNoteRequest {
    /// Validate the fields that are present, reporting all failures at once.
    pub fn validate(self) -> Result<Self> {
        let mut issues = Vec::new();
        let title = self
            .title
            .as_deref()
            .and_then(|t| collect(&mut issues, validate_title(t)));
        let content = self
            .content
            .as_deref()
            .and_then(|c| collect(&mut issues, validate_content(c)));

        if !issues.is_empty() {
            return Err(Error::Validation(issues));
        }
        Ok(Self {
            title,
            content,
            reason: self.reason,
        })
    }
}
