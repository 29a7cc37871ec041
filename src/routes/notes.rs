// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Note routes for authenticated users.
//!
//! Every handler passes the session's user ID down to the database, which
//! refuses to read or touch notes owned by anyone else.

use crate::error::{first_validation_message, AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::note::search_needle;
use crate::models::{new_id, parse_id, Note, NoteUpdate};
use crate::time_utils::now_rfc3339;
use crate::views;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
    Extension, Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Note routes (require authentication).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route("/edit/{id}", get(edit_form))
        .route("/update/{id}", post(update_note))
        .route("/delete/{id}", post(delete_note))
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

/// Submitted note fields. A checked checkbox sends `important=on`; an
/// unchecked one sends nothing.
#[derive(Debug, Deserialize, Validate)]
struct NoteForm {
    #[serde(default)]
    #[validate(length(max = 200, message = "Title is too long"))]
    title: String,
    #[serde(default)]
    #[validate(length(max = 20000, message = "Content is too long"))]
    content: String,
    #[serde(default)]
    important: Option<String>,
}

impl NoteForm {
    fn into_update(self) -> Result<NoteUpdate> {
        let form = NoteForm {
            title: self.title.trim().to_string(),
            ..self
        };

        if form.title.is_empty() {
            return Err(AppError::BadRequest("Title is required".to_string()));
        }

        form.validate()
            .map_err(|errors| AppError::BadRequest(first_validation_message(&errors)))?;

        Ok(NoteUpdate {
            title: form.title,
            content: form.content,
            important: form.important.is_some(),
        })
    }
}

/// List the user's notes, optionally filtered by `?q=`.
async fn list_notes(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<SearchQuery>,
) -> Result<Html<String>> {
    let needle = search_needle(params.q.as_deref());

    let notes = state
        .db
        .list_notes(&user.user_id, needle.as_deref())
        .await?;

    tracing::debug!(
        user_id = %user.user_id,
        searching = needle.is_some(),
        count = notes.len(),
        "Listed notes"
    );

    let shown_query = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    Ok(Html(views::index_page(&user.username, &notes, shown_query)))
}

/// Create a note owned by the current user.
async fn create_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Form(form): Form<NoteForm>,
) -> Result<Redirect> {
    let fields = form.into_update()?;
    let now = now_rfc3339();

    let note = Note {
        id: new_id(),
        title: fields.title,
        content: fields.content,
        important: fields.important,
        user_id: user.user_id,
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.insert_note(&note).await?;
    Ok(Redirect::to("/"))
}

/// Show the edit form for one of the user's notes.
async fn edit_form(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let note_id = parse_id(&id)?;

    let note = state
        .db
        .get_note(&user.user_id, &note_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Note not found".to_string()))?;

    Ok(Html(views::edit_page(&note)))
}

/// Update one of the user's notes. Unknown or foreign IDs change nothing.
async fn update_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Form(form): Form<NoteForm>,
) -> Result<Redirect> {
    let note_id = parse_id(&id)?;
    let fields = form.into_update()?;

    if !state.db.update_note(&user.user_id, &note_id, fields).await? {
        tracing::info!(user_id = %user.user_id, note_id = %note_id, "Update matched no note");
    }

    Ok(Redirect::to("/"))
}

/// Delete one of the user's notes. Unknown or foreign IDs change nothing.
async fn delete_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let note_id = parse_id(&id)?;

    if !state.db.delete_note(&user.user_id, &note_id).await? {
        tracing::info!(user_id = %user.user_id, note_id = %note_id, "Delete matched no note");
    }

    Ok(Redirect::to("/"))
}
