//! Data models for notes and their audit trail.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::defaults::{PAGE_LIMIT, PAGE_OFFSET};
use crate::error::{Error, Result};

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A stored note.
///
/// This is both the persisted row and the response body returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// User identifier who owns the note.
    pub owner_id: Option<String>,
}

impl Note {
    /// JSON snapshot recorded in audit entries.
    pub fn snapshot(&self) -> Result<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Request for creating a new note.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateNoteRequest {
    /// Note title (1-200 characters, not blank). Stored trimmed.
    pub title: String,
    /// Note content (1-10000 characters, not blank).
    pub content: String,
    /// Reason for creation, recorded on the audit entry.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Request for updating a note. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateNoteRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Reason for change, recorded on the audit entry.
    #[serde(default)]
    pub reason: Option<String>,
}

impl UpdateNoteRequest {
    /// True when the request would not change any note field.
    ///
    /// A reason on its own does not count as a change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Which notes a caller is allowed to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteScope {
    /// Every note (admins).
    All,
    /// Only notes owned by this user id. `None` matches nothing.
    Owner(Option<String>),
}

/// Pagination parameters for listing notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListNotesRequest {
    pub limit: i64,
    pub offset: i64,
}

impl Default for ListNotesRequest {
    fn default() -> Self {
        Self {
            limit: PAGE_LIMIT,
            offset: PAGE_OFFSET,
        }
    }
}

/// One page of notes.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListNotesResponse {
    pub items: Vec<Note>,
    /// Number of notes visible to the caller across all pages.
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

// =============================================================================
// AUDIT TYPES
// =============================================================================

/// Kind of operation captured by an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Read,
    Update,
    Delete,
    Error,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Read => "READ",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Error => "ERROR",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CREATE" => Ok(AuditAction::Create),
            "READ" => Ok(AuditAction::Read),
            "UPDATE" => Ok(AuditAction::Update),
            "DELETE" => Ok(AuditAction::Delete),
            "ERROR" => Ok(AuditAction::Error),
            other => Err(Error::Serialization(format!(
                "unknown audit action '{}'",
                other
            ))),
        }
    }
}

/// A persisted audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuditEntry {
    pub id: i64,
    /// User performing the action.
    pub user_id: Option<String>,
    pub action: AuditAction,
    /// Entity type, e.g. `Note`.
    pub entity: String,
    pub entity_id: Option<i64>,
    #[schema(value_type = Option<Object>)]
    pub before_state: Option<JsonValue>,
    #[schema(value_type = Option<Object>)]
    pub after_state: Option<JsonValue>,
    pub reason: Option<String>,
    /// Technical error details (ERROR entries only).
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// An audit entry about to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub user_id: Option<String>,
    pub action: AuditAction,
    pub entity: String,
    pub entity_id: Option<i64>,
    pub before_state: Option<JsonValue>,
    pub after_state: Option<JsonValue>,
    pub reason: Option<String>,
    pub error: Option<String>,
}

impl NewAuditEntry {
    /// Start an entry for `action` on `entity`.
    pub fn new(action: AuditAction, entity: impl Into<String>) -> Self {
        Self {
            user_id: None,
            action,
            entity: entity.into(),
            entity_id: None,
            before_state: None,
            after_state: None,
            reason: None,
            error: None,
        }
    }

    pub fn user(mut self, user_id: Option<&str>) -> Self {
        self.user_id = user_id.map(str::to_string);
        self
    }

    pub fn entity_id(mut self, id: Option<i64>) -> Self {
        self.entity_id = id;
        self
    }

    pub fn before(mut self, state: Option<JsonValue>) -> Self {
        self.before_state = state;
        self
    }

    pub fn after(mut self, state: Option<JsonValue>) -> Self {
        self.after_state = state;
        self
    }

    pub fn reason(mut self, reason: Option<&str>) -> Self {
        self.reason = reason.map(str::to_string);
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_note() -> Note {
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        Note {
            id: 7,
            title: "Groceries".to_string(),
            content: "milk".to_string(),
            created_at: ts,
            updated_at: ts,
            owner_id: Some("u1".to_string()),
        }
    }

    #[test]
    fn test_note_snapshot_contains_all_fields() {
        let snap = sample_note().snapshot().unwrap();
        assert_eq!(snap["id"], 7);
        assert_eq!(snap["title"], "Groceries");
        assert_eq!(snap["content"], "milk");
        assert_eq!(snap["owner_id"], "u1");
        assert!(snap["created_at"].as_str().unwrap().starts_with("2026-01-02T03:04:05"));
    }

    #[test]
    fn test_update_request_reason_only_is_empty() {
        let req = UpdateNoteRequest {
            reason: Some("typo".to_string()),
            ..Default::default()
        };
        assert!(req.is_empty());

        let req = UpdateNoteRequest {
            content: Some("x".to_string()),
            ..Default::default()
        };
        assert!(!req.is_empty());
    }

    #[test]
    fn test_update_request_deserializes_missing_fields() {
        let req: UpdateNoteRequest = serde_json::from_str("{}").unwrap();
        assert!(req.is_empty());
        assert!(req.reason.is_none());
    }

    #[test]
    fn test_audit_action_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&AuditAction::Delete).unwrap(),
            "\"DELETE\""
        );
        assert_eq!("UPDATE".parse::<AuditAction>().unwrap(), AuditAction::Update);
        assert!("update".parse::<AuditAction>().is_err());
    }

    #[test]
    fn test_list_request_defaults() {
        let req = ListNotesRequest::default();
        assert_eq!(req.limit, 10);
        assert_eq!(req.offset, 0);
    }

    #[test]
    fn test_new_audit_entry_builder() {
        let entry = NewAuditEntry::new(AuditAction::Create, "Note")
            .user(Some("u1"))
            .entity_id(Some(3))
            .reason(Some("initial"));
        assert_eq!(entry.user_id.as_deref(), Some("u1"));
        assert_eq!(entry.entity_id, Some(3));
        assert_eq!(entry.reason.as_deref(), Some("initial"));
        assert!(entry.before_state.is_none());
        assert!(entry.error.is_none());
    }
}
