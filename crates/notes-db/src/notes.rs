//! Note repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::debug;

use notes_core::defaults::NOTE_ENTITY;
use notes_core::{
    AuditAction, CreateNoteRequest, Error, ListNotesRequest, ListNotesResponse, NewAuditEntry,
    Note, NoteRepository, NoteScope, Result, UpdateNoteRequest, UserContext,
};

use crate::audit::SqliteAuditRepository;

/// SQLite implementation of NoteRepository.
#[derive(Clone)]
pub struct SqliteNoteRepository {
    pool: SqlitePool,
    audit: SqliteAuditRepository,
}

impl SqliteNoteRepository {
    /// Create a new SqliteNoteRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            audit: SqliteAuditRepository::new(pool.clone()),
            pool,
        }
    }

    fn map_row(row: &SqliteRow) -> Note {
        Note {
            id: row.get("id"),
            title: row.get("title"),
            content: row.get("content"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            owner_id: row.get("owner_id"),
        }
    }

    async fn fetch_tx(tx: &mut Transaction<'_, Sqlite>, id: i64) -> Result<Option<Note>> {
        let row = sqlx::query(
            "SELECT id, title, content, created_at, updated_at, owner_id FROM note WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(Error::Database)?;
        Ok(row.as_ref().map(Self::map_row))
    }
}

#[async_trait]
impl NoteRepository for SqliteNoteRepository {
    async fn create(&self, actor: &UserContext, req: CreateNoteRequest) -> Result<Note> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let result = sqlx::query(
            "INSERT INTO note (title, content, created_at, updated_at, owner_id)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&req.title)
        .bind(&req.content)
        .bind(now)
        .bind(now)
        .bind(&actor.user_id)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let note = Note {
            id: result.last_insert_rowid(),
            title: req.title,
            content: req.content,
            created_at: now,
            updated_at: now,
            owner_id: actor.user_id.clone(),
        };

        self.audit
            .record_tx(
                &mut tx,
                NewAuditEntry::new(AuditAction::Create, NOTE_ENTITY)
                    .user(actor.user_id.as_deref())
                    .entity_id(Some(note.id))
                    .after(Some(note.snapshot()?))
                    .reason(req.reason.as_deref()),
            )
            .await?;

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "create",
            note_id = note.id,
            "Note created"
        );
        Ok(note)
    }

    async fn fetch(&self, id: i64) -> Result<Option<Note>> {
        let row = sqlx::query(
            "SELECT id, title, content, created_at, updated_at, owner_id FROM note WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(row.as_ref().map(Self::map_row))
    }

    async fn list(&self, scope: &NoteScope, req: ListNotesRequest) -> Result<ListNotesResponse> {
        let start = Instant::now();

        let owner = match scope {
            NoteScope::All => None,
            NoteScope::Owner(Some(owner)) => Some(owner.as_str()),
            // Anonymous callers list nothing, not the ownerless notes: those
            // are admin-only, the same rule `can_access_note` applies.
            NoteScope::Owner(None) => {
                return Ok(ListNotesResponse {
                    items: Vec::new(),
                    total: 0,
                    limit: req.limit,
                    offset: req.offset,
                });
            }
        };

        let filter = if owner.is_some() {
            "WHERE owner_id = ?"
        } else {
            ""
        };

        let count_sql = format!("SELECT COUNT(*) FROM note {}", filter);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(owner) = owner {
            count_query = count_query.bind(owner);
        }
        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        let page_sql = format!(
            "SELECT id, title, content, created_at, updated_at, owner_id FROM note {}
             ORDER BY created_at DESC, id DESC
             LIMIT ? OFFSET ?",
            filter
        );
        let mut page_query = sqlx::query(&page_sql);
        if let Some(owner) = owner {
            page_query = page_query.bind(owner);
        }
        let rows = page_query
            .bind(req.limit)
            .bind(req.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let items: Vec<Note> = rows.iter().map(Self::map_row).collect();

        debug!(
            subsystem = "database",
            component = "notes",
            op = "list",
            result_count = items.len(),
            total,
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed notes"
        );

        Ok(ListNotesResponse {
            items,
            total,
            limit: req.limit,
            offset: req.offset,
        })
    }

    async fn update(&self, actor: &UserContext, id: i64, req: UpdateNoteRequest) -> Result<Note> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let before = Self::fetch_tx(&mut tx, id)
            .await?
            .ok_or(Error::NoteNotFound(id))?;

        let mut after = before.clone();
        if let Some(title) = req.title {
            after.title = title;
        }
        if let Some(content) = req.content {
            after.content = content;
        }
        after.updated_at = Utc::now();

        sqlx::query("UPDATE note SET title = ?, content = ?, updated_at = ? WHERE id = ?")
            .bind(&after.title)
            .bind(&after.content)
            .bind(after.updated_at)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        self.audit
            .record_tx(
                &mut tx,
                NewAuditEntry::new(AuditAction::Update, NOTE_ENTITY)
                    .user(actor.user_id.as_deref())
                    .entity_id(Some(id))
                    .before(Some(before.snapshot()?))
                    .after(Some(after.snapshot()?))
                    .reason(req.reason.as_deref()),
            )
            .await?;

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "update",
            note_id = id,
            "Note updated"
        );
        Ok(after)
    }

    async fn delete(&self, actor: &UserContext, id: i64, reason: Option<&str>) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let before = Self::fetch_tx(&mut tx, id)
            .await?
            .ok_or(Error::NoteNotFound(id))?;

        sqlx::query("DELETE FROM note WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        self.audit
            .record_tx(
                &mut tx,
                NewAuditEntry::new(AuditAction::Delete, NOTE_ENTITY)
                    .user(actor.user_id.as_deref())
                    .entity_id(Some(id))
                    .before(Some(before.snapshot()?))
                    .reason(reason),
            )
            .await?;

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "delete",
            note_id = id,
            "Note deleted"
        );
        Ok(())
    }
}
