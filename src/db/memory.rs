// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process storage for local development and tests.

use crate::error::AppError;
use crate::models::{Note, NoteUpdate, User};
use crate::time_utils::now_rfc3339;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Concurrent maps standing in for the Firestore collections.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    /// email -> user ID
    emails: DashMap<String, String>,
    notes: DashMap<String, Note>,
}

impl MemoryStore {
    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).map(|u| u.clone())
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let user_id = self.emails.get(email)?.clone();
        self.get_user(&user_id)
    }

    pub fn insert_user(&self, user: &User) -> Result<(), AppError> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict("User already exists".to_string())),
            Entry::Vacant(slot) => {
                self.users.insert(user.id.clone(), user.clone());
                slot.insert(user.id.clone());
                Ok(())
            }
        }
    }

    pub fn list_notes(&self, owner_id: &str) -> Vec<Note> {
        let mut notes: Vec<Note> = self
            .notes
            .iter()
            .filter(|entry| entry.user_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect();

        notes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        notes
    }

    pub fn insert_note(&self, note: &Note) {
        self.notes.insert(note.id.clone(), note.clone());
    }

    pub fn get_note(&self, note_id: &str) -> Option<Note> {
        self.notes.get(note_id).map(|n| n.clone())
    }

    pub fn update_note(&self, owner_id: &str, note_id: &str, update: NoteUpdate) -> bool {
        match self.notes.get_mut(note_id) {
            Some(mut note) if note.user_id == owner_id => {
                note.apply(update, &now_rfc3339());
                true
            }
            _ => false,
        }
    }

    pub fn delete_note(&self, owner_id: &str, note_id: &str) -> bool {
        self.notes
            .remove_if(note_id, |_, note| note.user_id == owner_id)
            .is_some()
    }
}
