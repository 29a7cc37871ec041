// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account registration and credential checks.

use crate::db::NoteDb;
use crate::error::{AppError, Result};
use crate::models::user::normalize_email;
use crate::models::{new_id, User};
use crate::services::google::GoogleProfile;
use crate::services::password;
use crate::time_utils::now_rfc3339;

/// Username given to Google accounts whose profile has no name.
const FALLBACK_USERNAME: &str = "No Name";

/// Run a password hash/verify off the async workers; Argon2 is deliberately slow.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password task failed: {}", e)))?
        .map_err(AppError::Internal)
}

/// Create a password account.
///
/// Returns [`AppError::Conflict`] if the email is taken.
pub async fn register(db: &NoteDb, username: &str, email: &str, password: &str) -> Result<User> {
    let email = normalize_email(email);

    if db.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password = password.to_string();
    let password_hash = blocking(move || password::hash_password(&password)).await?;

    let user = User {
        id: new_id(),
        username: username.trim().to_string(),
        email,
        password_hash: Some(password_hash),
        google_login: false,
        created_at: now_rfc3339(),
    };

    db.insert_user(&user).await?;
    Ok(user)
}

/// Check an email/password pair. `None` means the credentials are wrong.
pub async fn authenticate(db: &NoteDb, email: &str, password: &str) -> Result<Option<User>> {
    let email = normalize_email(email);

    let Some(user) = db.find_user_by_email(&email).await? else {
        tracing::debug!("Login for unknown email");
        return Ok(None);
    };

    let Some(hash) = user.password_hash.clone() else {
        tracing::debug!(user_id = %user.id, "Password login attempted on Google account");
        return Ok(None);
    };

    let password = password.to_string();
    let valid = blocking(move || password::verify_password(&password, &hash)).await?;

    Ok(valid.then_some(user))
}

/// Fetch the local account for a Google profile, creating it on first login.
pub async fn find_or_create_google_user(db: &NoteDb, profile: &GoogleProfile) -> Result<User> {
    let email = normalize_email(&profile.email);

    if let Some(user) = db.find_user_by_email(&email).await? {
        return Ok(user);
    }

    let username = profile
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_USERNAME)
        .to_string();

    let user = User {
        id: new_id(),
        username,
        email: email.clone(),
        password_hash: None,
        google_login: true,
        created_at: now_rfc3339(),
    };

    match db.insert_user(&user).await {
        Ok(()) => Ok(user),
        // Another callback for the same email won the race.
        Err(AppError::Conflict(_)) => db
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Database("User vanished after conflict".to_string())),
        Err(e) => Err(e),
    }
}
