// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Note model for storage and rendering.

use serde::{Deserialize, Serialize};

/// A note stored in the shared `notes` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    /// Random UUID (also used as document ID)
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub important: bool,
    /// Owning user's ID. Every query filters on this field.
    pub user_id: String,
    /// Creation time (RFC 3339)
    pub created_at: String,
    /// Last modification time (RFC 3339)
    pub updated_at: String,
}

/// Fields a user may change on an existing note.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteUpdate {
    pub title: String,
    pub content: String,
    pub important: bool,
}

impl Note {
    /// Case-insensitive substring match against title or content.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }

    /// Apply an update, bumping `updated_at`.
    pub fn apply(&mut self, update: NoteUpdate, now: &str) {
        self.title = update.title;
        self.content = update.content;
        self.important = update.important;
        self.updated_at = now.to_string();
    }
}

/// Normalize a raw search query: trimmed and lowercased, `None` when blank.
pub fn search_needle(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}
