// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! [`NoteDb`] is the single handle the rest of the crate talks to. It fronts
//! either Firestore or an in-process store; both enforce the same rule that
//! every note operation is scoped to the owning user.

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreStore;
pub use memory::MemoryStore;

use crate::config::{Config, StorageBackend};
use crate::error::AppError;
use crate::models::{Note, NoteUpdate, User};
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Create-only documents keyed by email; guarantees email uniqueness.
    pub const USER_EMAILS: &str = "user_emails";
    pub const NOTES: &str = "notes";
}

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreStore),
    Memory(Arc<MemoryStore>),
}

/// Handle to user and note storage.
#[derive(Clone)]
pub struct NoteDb {
    backend: Backend,
}

impl NoteDb {
    /// Connect to the backend selected in configuration.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.storage_backend {
            StorageBackend::Firestore => Ok(Self {
                backend: Backend::Firestore(FirestoreStore::new(&config.gcp_project_id).await?),
            }),
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data will not survive a restart");
                Ok(Self::new_memory())
            }
        }
    }

    /// Create an empty in-memory database.
    pub fn new_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::default())),
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.get_user(user_id).await,
            Backend::Memory(db) => Ok(db.get_user(user_id)),
        }
    }

    /// Look up a user by (normalized) email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.find_user_by_email(email).await,
            Backend::Memory(db) => Ok(db.find_user_by_email(email)),
        }
    }

    /// Insert a new user.
    ///
    /// Fails with [`AppError::Conflict`] if the email is already registered.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.insert_user(user).await?,
            Backend::Memory(db) => db.insert_user(user)?,
        }
        tracing::info!(user_id = %user.id, google_login = user.google_login, "User created");
        Ok(())
    }

    // ─── Note Operations ─────────────────────────────────────────

    /// List an owner's notes, newest first.
    ///
    /// `needle` is a lowercased search term matched against title and content.
    pub async fn list_notes(
        &self,
        owner_id: &str,
        needle: Option<&str>,
    ) -> Result<Vec<Note>, AppError> {
        let mut notes = match &self.backend {
            Backend::Firestore(db) => db.list_notes(owner_id).await?,
            Backend::Memory(db) => db.list_notes(owner_id),
        };

        if let Some(needle) = needle {
            notes.retain(|note| note.matches(needle));
        }

        Ok(notes)
    }

    /// Store a new note.
    pub async fn insert_note(&self, note: &Note) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.insert_note(note).await?,
            Backend::Memory(db) => db.insert_note(note),
        }
        tracing::debug!(note_id = %note.id, user_id = %note.user_id, "Note created");
        Ok(())
    }

    /// Get a note if it exists and belongs to `owner_id`.
    pub async fn get_note(&self, owner_id: &str, note_id: &str) -> Result<Option<Note>, AppError> {
        let note = match &self.backend {
            Backend::Firestore(db) => db.get_note(note_id).await?,
            Backend::Memory(db) => db.get_note(note_id),
        };
        Ok(note.filter(|n| n.user_id == owner_id))
    }

    /// Update a note owned by `owner_id`. Returns whether a note was changed.
    pub async fn update_note(
        &self,
        owner_id: &str,
        note_id: &str,
        update: NoteUpdate,
    ) -> Result<bool, AppError> {
        let updated = match &self.backend {
            Backend::Firestore(db) => db.update_note(owner_id, note_id, update).await?,
            Backend::Memory(db) => db.update_note(owner_id, note_id, update),
        };
        tracing::debug!(note_id, user_id = owner_id, updated, "Note update");
        Ok(updated)
    }

    /// Delete a note owned by `owner_id`. Returns whether a note was removed.
    pub async fn delete_note(&self, owner_id: &str, note_id: &str) -> Result<bool, AppError> {
        let deleted = match &self.backend {
            Backend::Firestore(db) => db.delete_note(owner_id, note_id).await?,
            Backend::Memory(db) => db.delete_note(owner_id, note_id),
        };
        tracing::debug!(note_id, user_id = owner_id, deleted, "Note delete");
        Ok(deleted)
    }
}
