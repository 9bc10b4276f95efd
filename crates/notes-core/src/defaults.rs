//! Centralized default constants for the notes service.
//!
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// NOTE FIELDS
// =============================================================================

/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Maximum content length, in characters.
pub const CONTENT_MAX_CHARS: usize = 10_000;

/// Entity name recorded on audit entries for notes.
pub const NOTE_ENTITY: &str = "Note";

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for the notes list.
pub const PAGE_LIMIT: i64 = 10;

/// Largest page size a caller may request.
pub const PAGE_LIMIT_MAX: i64 = 100;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;

// =============================================================================
// SERVER
// =============================================================================

/// Default database location (relative to the working directory).
pub const DATABASE_URL: &str = "sqlite://./app.db";

/// Default bind host.
pub const HOST: &str = "0.0.0.0";

/// Default bind port.
pub const PORT: u16 = 3001;

/// Default request body limit in bytes (1 MiB).
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Default number of pooled SQLite connections.
pub const DB_MAX_CONNECTIONS: u32 = 5;
