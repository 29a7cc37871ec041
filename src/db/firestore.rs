// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage, with an email index for uniqueness)
//! - Notes (one shared collection, every query filtered by `user_id`)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Note, NoteUpdate, User};
use crate::time_utils::now_rfc3339;
use firestore::errors::FirestoreError;
use firestore::FirestoreWritePrecondition;
use serde::{Deserialize, Serialize};

/// Document in `user_emails`, keyed by the URL-encoded email.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmailClaim {
    user_id: String,
}

fn email_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}

/// Firestore-backed storage.
#[derive(Clone)]
pub struct FirestoreStore {
    client: firestore::FirestoreDb,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users: Vec<User> = self
            .client
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.field("email").eq(email))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    /// Claim the email, then write the user.
    ///
    /// Firestore `insert` refuses to overwrite an existing document, so the
    /// email claim is the uniqueness check.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let claim = EmailClaim {
            user_id: user.id.clone(),
        };

        let inserted: Result<EmailClaim, FirestoreError> = self
            .client
            .fluent()
            .insert()
            .into(collections::USER_EMAILS)
            .document_id(email_doc_id(&user.email))
            .object(&claim)
            .execute()
            .await;

        match inserted {
            Ok(_) => {}
            Err(FirestoreError::DataConflictError(_)) => {
                return Err(AppError::Conflict("User already exists".to_string()));
            }
            Err(e) => return Err(AppError::Database(e.to_string())),
        }

        let written: Result<User, FirestoreError> = self
            .client
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await;

        if let Err(e) = written {
            // Release the email so a retry can succeed.
            if let Err(cleanup) = self
                .client
                .fluent()
                .delete()
                .from(collections::USER_EMAILS)
                .document_id(email_doc_id(&user.email))
                .execute()
                .await
            {
                tracing::error!(error = %cleanup, "Failed to release email claim");
            }
            return Err(AppError::Database(e.to_string()));
        }

        Ok(())
    }

    // ─── Note Operations ─────────────────────────────────────────

    pub async fn list_notes(&self, owner_id: &str) -> Result<Vec<Note>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::NOTES)
            .filter(|q| q.field("user_id").eq(owner_id))
            .order_by([("created_at", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn insert_note(&self, note: &Note) -> Result<(), AppError> {
        let _: Note = self
            .client
            .fluent()
            .insert()
            .into(collections::NOTES)
            .document_id(&note.id)
            .object(note)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Fetch by ID without an ownership check; the caller filters.
    pub async fn get_note(&self, note_id: &str) -> Result<Option<Note>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::NOTES)
            .obj()
            .one(note_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn update_note(
        &self,
        owner_id: &str,
        note_id: &str,
        update: NoteUpdate,
    ) -> Result<bool, AppError> {
        let Some(mut note) = self.get_note(note_id).await? else {
            return Ok(false);
        };
        if note.user_id != owner_id {
            return Ok(false);
        }

        note.apply(update, &now_rfc3339());
        self.overwrite_existing_note(&note).await
    }

    /// Replace a stored note, refusing to recreate one deleted since it was read.
    async fn overwrite_existing_note(&self, note: &Note) -> Result<bool, AppError> {
        let written: Result<Note, FirestoreError> = self
            .client
            .fluent()
            .update()
            .in_col(collections::NOTES)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .document_id(&note.id)
            .object(note)
            .execute()
            .await;

        match written {
            Ok(_) => Ok(true),
            Err(FirestoreError::DataNotFoundError(_)) => {
                tracing::debug!(note_id = %note.id, "Note deleted before update landed");
                Ok(false)
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    pub async fn delete_note(&self, owner_id: &str, note_id: &str) -> Result<bool, AppError> {
        match self.get_note(note_id).await? {
            Some(note) if note.user_id == owner_id => {}
            _ => return Ok(false),
        }

        self.client
            .fluent()
            .delete()
            .from(collections::NOTES)
            .document_id(note_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(true)
    }
}
