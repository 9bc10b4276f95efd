//! Repository traits implemented by the storage layer.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    AuditEntry, CreateNoteRequest, ListNotesRequest, ListNotesResponse, NewAuditEntry, Note,
    NoteScope, UpdateNoteRequest,
};
use crate::security::UserContext;

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Repository for note storage.
///
/// Every mutation records its audit entry in the same transaction as the
/// change. Requests are expected to be validated already; authorization is
/// the caller's responsibility.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note owned by `actor.user_id`.
    async fn create(&self, actor: &UserContext, req: CreateNoteRequest) -> Result<Note>;

    /// Fetch a note by ID.
    async fn fetch(&self, id: i64) -> Result<Option<Note>>;

    /// List notes visible within `scope`, newest first.
    async fn list(&self, scope: &NoteScope, req: ListNotesRequest) -> Result<ListNotesResponse>;

    /// Apply the present fields of `req` to a note.
    async fn update(&self, actor: &UserContext, id: i64, req: UpdateNoteRequest) -> Result<Note>;

    /// Permanently delete a note.
    async fn delete(&self, actor: &UserContext, id: i64, reason: Option<&str>) -> Result<()>;
}

// =============================================================================
// AUDIT REPOSITORY
// =============================================================================

/// Repository for the append-only audit trail.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Persist an entry on its own.
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditEntry>;

    /// Entries about one entity, oldest first.
    async fn list_for_entity(&self, entity: &str, entity_id: i64) -> Result<Vec<AuditEntry>>;

    /// All entries, newest first.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<AuditEntry>>;
}
