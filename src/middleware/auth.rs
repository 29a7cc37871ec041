// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT session middleware.

use crate::error::AppError;
use crate::time_utils::unix_now;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "access_token";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
}

/// Create a JWT for a user session.
pub fn create_jwt(user_id: &str, signing_key: &[u8], ttl_secs: u64) -> anyhow::Result<String> {
    let now = unix_now() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now.saturating_add(ttl_secs as usize),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Verify signature and expiry, returning the claims.
pub fn verify_jwt(token: &str, signing_key: &[u8]) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation.leeway = 0;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            AppError::InvalidToken
        })
}

/// Pull the session token from the cookie, falling back to a Bearer header.
fn extract_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

/// Middleware that requires a valid session.
///
/// Anonymous callers are redirected to `/login`; a bad or expired cookie is
/// also cleared.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&jar, request.headers()).ok_or(AppError::Unauthorized)?;
    let claims = verify_jwt(&token, &state.config.jwt_signing_key)?;

    // A valid token for a user that no longer exists is as good as no token.
    let user = state.db.get_user(&claims.sub).await?.ok_or_else(|| {
        tracing::warn!(user_id = %claims.sub, "Session for unknown user");
        AppError::InvalidToken
    })?;

    request.extensions_mut().insert(AuthUser {
        user_id: user.id,
        username: user.username,
    });

    Ok(next.run(request).await)
}
