//! Note CRUD handlers.
//!
//! Users see and modify only the notes they own; admins reach every note.
//! A note the caller cannot access answers 404, exactly like a missing one.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::IntoParams;

use notes_core::defaults::NOTE_ENTITY;
use notes_core::{
    can_access_note, require_role, validate_pagination, AuditAction, AuditEntry,
    AuditRepository, CreateNoteRequest, ListNotesResponse, NewAuditEntry, Note, NoteRepository,
    Role, UpdateNoteRequest, UserContext, NOTE_ROLES,
};

use crate::error::ApiError;
use crate::extract::{CurrentUser, ValidJson, ValidPath, ValidQuery};
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListNotesQuery {
    /// Page size (1-100, default 10)
    pub limit: Option<i64>,
    /// Number of notes to skip (default 0)
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteNoteQuery {
    /// Reason for deletion
    pub reason: Option<String>,
}

/// Load a note the caller is allowed to see, or answer 404.
async fn load_accessible(state: &AppState, user: &UserContext, id: i64) -> Result<Note, ApiError> {
    match state.db.notes.fetch(id).await? {
        Some(note) if can_access_note(user, note.owner_id.as_deref()) => Ok(note),
        _ => Err(ApiError::note_not_found()),
    }
}

/// Record a best-effort ERROR audit entry when a mutation fails server-side.
async fn audit_failure(
    state: &AppState,
    user: &UserContext,
    note_id: Option<i64>,
    err: &notes_core::Error,
) {
    if err.is_client_error() {
        return;
    }
    let entry = NewAuditEntry::new(AuditAction::Error, NOTE_ENTITY)
        .user(user.user_id.as_deref())
        .entity_id(note_id)
        .error(err.to_string());
    if let Err(audit_err) = state.db.audit.record(entry).await {
        warn!(
            subsystem = "api",
            component = "notes",
            error = %audit_err,
            "Failed to record error audit entry"
        );
    }
}

/// Create a note owned by the caller.
///
/// POST /notes
#[utoipa::path(post, path = "/notes", tag = "Notes",
    request_body = CreateNoteRequest,
    params(
        ("X-User-Id" = Option<String>, Header, description = "Caller user id; becomes the owner"),
        ("X-User-Role" = Option<String>, Header, description = "admin or user (default)"),
    ),
    responses(
        (status = 201, description = "Created", body = Note),
        (status = 422, description = "Validation failed", body = crate::error::ValidationErrorBody),
    ))]
pub async fn create_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(body): ValidJson<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let req = body.validate()?;
    require_role(&user, NOTE_ROLES)?;

    let note = match state.db.notes.create(&user, req).await {
        Ok(note) => note,
        Err(err) => {
            audit_failure(&state, &user, None, &err).await;
            return Err(err.into());
        }
    };

    info!(
        subsystem = "api",
        component = "notes",
        op = "create",
        note_id = note.id,
        user_id = ?user.user_id,
        "Note created"
    );
    Ok((StatusCode::CREATED, Json(note)))
}

/// List notes, newest first. Users see only their own notes; admins see all.
///
/// GET /notes
#[utoipa::path(get, path = "/notes", tag = "Notes",
    params(ListNotesQuery),
    responses(
        (status = 200, description = "One page of notes", body = ListNotesResponse),
        (status = 422, description = "Invalid pagination", body = crate::error::ValidationErrorBody),
    ))]
pub async fn list_notes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidQuery(query): ValidQuery<ListNotesQuery>,
) -> Result<Json<ListNotesResponse>, ApiError> {
    let page = validate_pagination(query.limit, query.offset)?;
    require_role(&user, NOTE_ROLES)?;

    let response = state.db.notes.list(&user.scope(), page).await?;
    Ok(Json(response))
}

/// Retrieve a single note.
///
/// GET /notes/{note_id}
#[utoipa::path(get, path = "/notes/{note_id}", tag = "Notes",
    params(("note_id" = i64, Path, description = "Note ID")),
    responses(
        (status = 200, description = "The note", body = Note),
        (status = 404, description = "Missing or not accessible", body = crate::error::ErrorBody),
    ))]
pub async fn get_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidPath(note_id): ValidPath<i64>,
) -> Result<Json<Note>, ApiError> {
    require_role(&user, NOTE_ROLES)?;
    let note = load_accessible(&state, &user, note_id).await?;
    Ok(Json(note))
}

/// Update the title and/or content of a note.
///
/// PUT /notes/{note_id}
#[utoipa::path(put, path = "/notes/{note_id}", tag = "Notes",
    params(("note_id" = i64, Path, description = "Note ID")),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Updated note", body = Note),
        (status = 400, description = "No fields provided to update", body = crate::error::ErrorBody),
        (status = 404, description = "Missing or not accessible", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ValidationErrorBody),
    ))]
pub async fn update_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidPath(note_id): ValidPath<i64>,
    ValidJson(body): ValidJson<UpdateNoteRequest>,
) -> Result<Json<Note>, ApiError> {
    let req = body.validate()?;
    require_role(&user, NOTE_ROLES)?;
    load_accessible(&state, &user, note_id).await?;

    if req.is_empty() {
        return Err(ApiError::BadRequest(
            "No fields provided to update".to_string(),
        ));
    }

    let note = match state.db.notes.update(&user, note_id, req).await {
        Ok(note) => note,
        Err(err) => {
            audit_failure(&state, &user, Some(note_id), &err).await;
            return Err(err.into());
        }
    };

    info!(
        subsystem = "api",
        component = "notes",
        op = "update",
        note_id,
        user_id = ?user.user_id,
        "Note updated"
    );
    Ok(Json(note))
}

/// Delete a note.
///
/// DELETE /notes/{note_id}
#[utoipa::path(delete, path = "/notes/{note_id}", tag = "Notes",
    params(("note_id" = i64, Path, description = "Note ID"), DeleteNoteQuery),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Missing or not accessible", body = crate::error::ErrorBody),
    ))]
pub async fn delete_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidPath(note_id): ValidPath<i64>,
    ValidQuery(query): ValidQuery<DeleteNoteQuery>,
) -> Result<StatusCode, ApiError> {
    require_role(&user, NOTE_ROLES)?;
    load_accessible(&state, &user, note_id).await?;

    if let Err(err) = state
        .db
        .notes
        .delete(&user, note_id, query.reason.as_deref())
        .await
    {
        audit_failure(&state, &user, Some(note_id), &err).await;
        return Err(err.into());
    }

    info!(
        subsystem = "api",
        component = "notes",
        op = "delete",
        note_id,
        user_id = ?user.user_id,
        "Note deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Audit trail of a note, oldest first. Admin only.
///
/// GET /notes/{note_id}/audit
#[utoipa::path(get, path = "/notes/{note_id}/audit", tag = "Notes",
    params(("note_id" = i64, Path, description = "Note ID")),
    responses(
        (status = 200, description = "Audit entries", body = [AuditEntry]),
        (status = 403, description = "Caller is not an admin", body = crate::error::ErrorBody),
    ))]
pub async fn get_note_audit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidPath(note_id): ValidPath<i64>,
) -> Result<Json<Vec<AuditEntry>>, ApiError> {
    require_role(&user, &[Role::Admin])?;
    let entries = state.db.audit.list_for_entity(NOTE_ENTITY, note_id).await?;
    Ok(Json(entries))
}
