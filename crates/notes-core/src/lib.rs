//! # notes-core
//!
//! Core types, traits, and access rules for the notes service.
//!
//! This crate provides the data structures, validation, and repository trait
//! definitions that the database and HTTP crates depend on.

pub mod defaults;
pub mod error;
pub mod models;
pub mod security;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use security::{can_access_note, require_role, Role, UserContext, NOTE_ROLES};
pub use traits::*;
pub use validation::{validate_content, validate_pagination, validate_title, ValidationIssue};
