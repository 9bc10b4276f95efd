//! Caller identity and role-based access rules.
//!
//! Identity is trusted as supplied by the caller (`X-User-Id` and
//! `X-User-Role` headers at the HTTP layer). Admins see every note; users
//! only the notes they own.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::NoteScope;

/// Role of the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// Parse a role header value. Only `admin` (any case) grants admin;
    /// everything else, including a missing header, is a plain user.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("admin") => Role::Admin,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

/// Roles permitted to use the note endpoints.
pub const NOTE_ROLES: &[Role] = &[Role::Admin, Role::User];

/// The current request's user context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: Option<String>,
    pub role: Role,
}

impl UserContext {
    pub fn new(user_id: Option<&str>, role: Role) -> Self {
        Self {
            user_id: user_id.map(str::to_string),
            role,
        }
    }

    pub fn user(user_id: &str) -> Self {
        Self::new(Some(user_id), Role::User)
    }

    pub fn admin(user_id: &str) -> Self {
        Self::new(Some(user_id), Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The set of notes this caller may list.
    pub fn scope(&self) -> NoteScope {
        if self.is_admin() {
            NoteScope::All
        } else {
            NoteScope::Owner(self.user_id.clone())
        }
    }
}

/// Enforce role-based access control.
pub fn require_role(user: &UserContext, allowed: &[Role]) -> Result<()> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(Error::Forbidden(
            "Insufficient permissions for this operation".to_string(),
        ))
    }
}

/// Whether `user` may read or modify a note owned by `owner_id`.
///
/// A note without an owner is reachable by admins only.
pub fn can_access_note(user: &UserContext, owner_id: Option<&str>) -> bool {
    if user.is_admin() {
        return true;
    }
    match (owner_id, user.user_id.as_deref()) {
        (Some(owner), Some(caller)) => owner == caller,
        _ => false,
    }
}
