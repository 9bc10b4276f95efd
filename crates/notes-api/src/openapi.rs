use utoipa::OpenApi;

use notes_core::{
    AuditAction, AuditEntry, CreateNoteRequest, ListNotesResponse, Note, UpdateNoteRequest,
    ValidationIssue,
};

use crate::error::{ErrorBody, ValidationErrorBody};
use crate::handlers::{health, notes};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notes Management API",
        version = "1.0.0",
        description = "Notes CRUD with role-based access and an audit trail"
    ),
    paths(
        health::root,
        health::health_check,
        notes::create_note,
        notes::list_notes,
        notes::get_note,
        notes::update_note,
        notes::delete_note,
        notes::get_note_audit,
    ),
    components(schemas(
        Note,
        CreateNoteRequest,
        UpdateNoteRequest,
        ListNotesResponse,
        AuditAction,
        AuditEntry,
        ValidationIssue,
        ErrorBody,
        ValidationErrorBody,
    )),
    tags(
        (name = "Health", description = "Liveness checks"),
        (name = "Notes", description = "Note CRUD operations")
    )
)]
pub struct ApiDoc;
