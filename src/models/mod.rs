// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod note;
pub mod user;

pub use note::{Note, NoteUpdate};
pub use user::User;

use crate::error::AppError;

/// Generate a fresh document ID.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Parse a document ID from a request path, normalizing it to the stored form.
pub fn parse_id(raw: &str) -> Result<String, AppError> {
    uuid::Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| AppError::BadRequest(format!("Invalid id: {}", raw)))
}
