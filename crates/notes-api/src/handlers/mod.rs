//! HTTP handlers for notes-api.

pub mod health;
pub mod notes;
