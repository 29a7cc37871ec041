//! User model for storage.

use serde::{Deserialize, Serialize};

/// User account stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Random UUID (also used as document ID)
    pub id: String,
    /// Display name
    pub username: String,
    /// Email address, trimmed and lowercased; unique across users
    pub email: String,
    /// Argon2 PHC hash. `None` for accounts created through Google.
    pub password_hash: Option<String>,
    /// Whether the account was created through Google sign-in
    #[serde(default)]
    pub google_login: bool,
    /// When the account was created (RFC 3339)
    pub created_at: String,
}

/// Canonical form of an email address used for lookups and uniqueness.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
