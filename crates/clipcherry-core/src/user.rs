//! User accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A registered user.
///
/// Users are created on registration and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Row id.
    pub id: UserId,

    /// Display name, not unique.
    pub username: String,

    /// Login email, unique across users. Stored normalized.
    pub email: String,

    /// Hex digest of the password.
    pub password_hash: String,

    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// A user about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub username: String,
    /// Normalized email (see [`normalize_email`]).
    pub email: String,
    /// Hex digest of the password.
    pub password_hash: String,
}

/// Normalize an email for storage and lookup: trimmed and lower-cased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
