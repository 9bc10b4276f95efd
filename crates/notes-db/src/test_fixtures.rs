//! Test fixtures for database integration tests.
//!
//! Each [`TestDatabase`] is a private in-memory SQLite database with the
//! schema already created, so tests never share state.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notes_db::test_fixtures::TestDatabase;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let test_db = TestDatabase::new().await;
//!     let note = test_db.seed_note("u1", "Title").await;
//!     // Run your tests...
//! }
//! ```

use sqlx::SqlitePool;

use crate::{CreateNoteRequest, Database, Note, NoteRepository, PoolConfig, UserContext};

/// URL of a private in-memory database.
pub const IN_MEMORY_DATABASE_URL: &str = "sqlite::memory:";

/// In-memory database with the schema initialized.
pub struct TestDatabase {
    pub pool: SqlitePool,
    pub db: Database,
}

impl TestDatabase {
    /// Create a fresh, empty database.
    pub async fn new() -> Self {
        let db = Database::connect_with_config(IN_MEMORY_DATABASE_URL, PoolConfig::in_memory())
            .await
            .expect("Failed to open in-memory test database");
        db.init_schema()
            .await
            .expect("Failed to initialize test schema");
        Self {
            pool: db.pool.clone(),
            db,
        }
    }

    /// Insert a note owned by `owner` with placeholder content.
    pub async fn seed_note(&self, owner: &str, title: &str) -> Note {
        self.db
            .notes
            .create(
                &UserContext::user(owner),
                CreateNoteRequest {
                    title: title.to_string(),
                    content: format!("content of {}", title),
                    reason: None,
                },
            )
            .await
            .expect("Failed to seed note")
    }
}
