//! Table definitions, created idempotently at startup.

use sqlx::SqlitePool;
use tracing::info;

use notes_core::{Error, Result};

/// Statements run by [`init_schema`], in order.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS note (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        title       TEXT    NOT NULL,
        content     TEXT    NOT NULL,
        created_at  TEXT    NOT NULL,
        updated_at  TEXT    NOT NULL,
        owner_id    TEXT
    )",
    "CREATE INDEX IF NOT EXISTS ix_note_title ON note (title)",
    "CREATE INDEX IF NOT EXISTS ix_note_created_at ON note (created_at)",
    "CREATE INDEX IF NOT EXISTS ix_note_owner_id ON note (owner_id)",
    "CREATE TABLE IF NOT EXISTS audit_log (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id       TEXT,
        action        TEXT    NOT NULL,
        entity        TEXT    NOT NULL,
        entity_id     INTEGER,
        before_state  TEXT,
        after_state   TEXT,
        reason        TEXT,
        error         TEXT,
        timestamp     TEXT    NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS ix_audit_log_timestamp ON audit_log (timestamp)",
    "CREATE INDEX IF NOT EXISTS ix_audit_log_entity ON audit_log (entity, entity_id)",
];

/// Create the `note` and `audit_log` tables and their indexes if missing.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await.map_err(Error::Database)?;
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
    }
    tx.commit().await.map_err(Error::Database)?;

    info!(
        subsystem = "database",
        component = "schema",
        op = "init",
        statements = SCHEMA.len(),
        "Database initialized and tables created"
    );
    Ok(())
}
