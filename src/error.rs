// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent HTML responses.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::views;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status this error maps to. Auth failures become a 303 to `/login`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidToken => StatusCode::SEE_OTHER,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::OAuth(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Unauthorized => return Redirect::to("/login").into_response(),
            AppError::InvalidToken => {
                // Drop the stale cookie so the browser stops replaying it.
                let clear = crate::routes::auth::clear_session_cookie().to_string();
                return (
                    status,
                    [(header::LOCATION, "/login".to_string()), (header::SET_COOKIE, clear)],
                )
                    .into_response();
            }
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            AppError::OAuth(msg) => {
                tracing::warn!(error = %msg, "OAuth flow failed");
                "Google authentication failed".to_string()
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                "Something went wrong. Please try again.".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                "Something went wrong. Please try again.".to_string()
            }
        };

        (status, Html(views::error_page(status, &message))).into_response()
    }
}

/// First human-readable message out of a form validation failure.
pub fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input".to_string())
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
