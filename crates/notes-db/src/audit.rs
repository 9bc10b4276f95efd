//! Audit trail repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::info;

use notes_core::{AuditEntry, AuditRepository, Error, NewAuditEntry, Result};

const SELECT_COLUMNS: &str = "SELECT id, user_id, action, entity, entity_id, before_state,
        after_state, reason, error, timestamp
     FROM audit_log";

/// SQLite implementation of AuditRepository.
#[derive(Clone)]
pub struct SqliteAuditRepository {
    pool: SqlitePool,
}

impl SqliteAuditRepository {
    /// Create a new SqliteAuditRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Write an entry inside an open transaction.
    ///
    /// The entry becomes visible only if the caller commits.
    pub async fn record_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        entry: NewAuditEntry,
    ) -> Result<AuditEntry> {
        let timestamp = Utc::now();
        let before = encode_state(entry.before_state.as_ref())?;
        let after = encode_state(entry.after_state.as_ref())?;

        let result = sqlx::query(
            "INSERT INTO audit_log (user_id, action, entity, entity_id, before_state,
                                    after_state, reason, error, timestamp)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&entry.user_id)
        .bind(entry.action.as_str())
        .bind(&entry.entity)
        .bind(entry.entity_id)
        .bind(before)
        .bind(after)
        .bind(&entry.reason)
        .bind(&entry.error)
        .bind(timestamp)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "audit",
            action = %entry.action,
            entity = %entry.entity,
            entity_id = ?entry.entity_id,
            user_id = ?entry.user_id,
            reason = ?entry.reason,
            "Audit entry recorded"
        );

        Ok(AuditEntry {
            id: result.last_insert_rowid(),
            user_id: entry.user_id,
            action: entry.action,
            entity: entry.entity,
            entity_id: entry.entity_id,
            before_state: entry.before_state,
            after_state: entry.after_state,
            reason: entry.reason,
            error: entry.error,
            timestamp,
        })
    }

    fn parse_row(row: &SqliteRow) -> Result<AuditEntry> {
        let action: String = row.get("action");
        let before: Option<String> = row.get("before_state");
        let after: Option<String> = row.get("after_state");
        Ok(AuditEntry {
            id: row.get("id"),
            user_id: row.get("user_id"),
            action: action.parse()?,
            entity: row.get("entity"),
            entity_id: row.get("entity_id"),
            before_state: decode_state(before)?,
            after_state: decode_state(after)?,
            reason: row.get("reason"),
            error: row.get("error"),
            timestamp: row.get("timestamp"),
        })
    }
}

fn encode_state(state: Option<&JsonValue>) -> Result<Option<String>> {
    state
        .map(serde_json::to_string)
        .transpose()
        .map_err(Error::from)
}

fn decode_state(raw: Option<String>) -> Result<Option<JsonValue>> {
    raw.as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(Error::from)
}

#[async_trait]
impl AuditRepository for SqliteAuditRepository {
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditEntry> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let recorded = self.record_tx(&mut tx, entry).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(recorded)
    }

    async fn list_for_entity(&self, entity: &str, entity_id: i64) -> Result<Vec<AuditEntry>> {
        let rows = sqlx::query(&format!(
            "{} WHERE entity = ? AND entity_id = ? ORDER BY id ASC",
            SELECT_COLUMNS
        ))
        .bind(entity)
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(Self::parse_row).collect()
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<AuditEntry>> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY id DESC LIMIT ? OFFSET ?",
            SELECT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(Self::parse_row).collect()
    }
}
