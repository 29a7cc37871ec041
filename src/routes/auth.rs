// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes: signup, password login, Google sign-in, logout.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::config::Config;
use crate::error::{first_validation_message, AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::services::accounts;
use crate::services::oauth_state::{OAuthStateSigner, STATE_MAX_AGE_SECS};
use crate::time_utils::unix_now;
use crate::views;
use crate::AppState;

/// Cookie binding an OAuth round trip to the browser that started it.
pub const NONCE_COOKIE: &str = "oauth_nonce";
const CALLBACK_PATH: &str = "/auth/google/callback";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", get(signup_form).post(signup))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout).post(logout))
        .route("/login/google", get(google_start))
        .route(CALLBACK_PATH, get(google_callback))
}

// ─── Cookies ─────────────────────────────────────────────────

/// Session cookie carrying a freshly issued JWT that lives `ttl_secs`.
pub fn session_cookie(config: &Config, token: String, ttl_secs: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies())
        .max_age(time::Duration::seconds(ttl_secs))
        .build()
}

/// Expired session cookie that makes the browser drop `access_token`.
pub fn clear_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();
    cookie
}

fn nonce_cookie(config: &Config, nonce: String) -> Cookie<'static> {
    Cookie::build((NONCE_COOKIE, nonce))
        .path(CALLBACK_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies())
        .max_age(time::Duration::seconds(STATE_MAX_AGE_SECS as i64))
        .build()
}

fn clear_nonce_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((NONCE_COOKIE, ""))
        .path(CALLBACK_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();
    cookie
}

/// Sign a session JWT for `user_id` using the configured lifetime.
fn issue_session(config: &Config, user_id: &str) -> Result<Cookie<'static>> {
    let ttl_secs = config.session_ttl_secs().ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "Session TTL of {} minutes overflows",
            config.session_ttl_minutes
        ))
    })?;

    let token = create_jwt(user_id, &config.jwt_signing_key, ttl_secs as u64)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;
    Ok(session_cookie(config, token, ttl_secs))
}

// ─── Signup ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(length(max = 50, message = "Username must be at most 50 characters"))]
    username: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    email: String,
    #[serde(default)]
    #[validate(length(max = 1024, message = "Password is too long"))]
    password: String,
}

async fn signup_form() -> Html<String> {
    Html(views::signup_page(None, "", ""))
}

async fn signup(State(state): State<Arc<AppState>>, Form(form): Form<SignupForm>) -> Result<Response> {
    let form = SignupForm {
        username: form.username.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password,
    };

    let rerender = |status: StatusCode, message: &str| {
        (
            status,
            Html(views::signup_page(Some(message), &form.username, &form.email)),
        )
            .into_response()
    };

    if form.username.is_empty() || form.email.is_empty() || form.password.is_empty() {
        return Ok(rerender(StatusCode::BAD_REQUEST, "All fields required"));
    }

    if let Err(errors) = form.validate() {
        return Ok(rerender(
            StatusCode::BAD_REQUEST,
            &first_validation_message(&errors),
        ));
    }

    match accounts::register(&state.db, &form.username, &form.email, &form.password).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "Signup complete");
            Ok(Redirect::to("/login").into_response())
        }
        Err(AppError::Conflict(message)) => Ok(rerender(StatusCode::CONFLICT, &message)),
        Err(e) => Err(e),
    }
}

// ─── Password Login ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn login_form() -> Html<String> {
    Html(views::login_page(None, ""))
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let user = if form.email.trim().is_empty() || form.password.is_empty() {
        None
    } else {
        accounts::authenticate(&state.db, &form.email, &form.password).await?
    };

    let Some(user) = user else {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Html(views::login_page(Some("Invalid credentials"), form.email.trim())),
        )
            .into_response());
    };

    tracing::info!(user_id = %user.id, "Password login successful");

    let cookie = issue_session(&state.config, &user.id)?;
    Ok((jar.add(cookie), Redirect::to("/")).into_response())
}

// ─── Logout ──────────────────────────────────────────────────

/// Drop the session cookie. Tokens stay valid until expiry; there is no revocation list.
async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.add(clear_session_cookie()), Redirect::to("/login"))
}

// ─── Google Sign-In ──────────────────────────────────────────

fn state_signer(config: &Config) -> Result<OAuthStateSigner> {
    Ok(OAuthStateSigner::new(&config.jwt_signing_key)?)
}

/// Start OAuth flow - redirect to Google's consent screen.
async fn google_start(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    let oauth_state = state_signer(&state.config)?.sign(&nonce, unix_now());
    let auth_url = state.google.authorize_url(&oauth_state);

    tracing::info!("Starting Google OAuth flow");

    Ok((
        jar.add(nonce_cookie(&state.config, nonce)),
        Redirect::to(&auth_url),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - verify state, exchange code, create session.
async fn google_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    if let Some(error) = params.error {
        return Err(AppError::OAuth(format!("Google returned error: {}", error)));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::OAuth("Missing authorization code".to_string()))?;
    let returned_state = params
        .state
        .ok_or_else(|| AppError::OAuth("Missing state parameter".to_string()))?;
    let nonce = jar
        .get(NONCE_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::OAuth("Missing OAuth nonce cookie".to_string()))?;

    state_signer(&state.config)?
        .verify(&returned_state, &nonce, unix_now())
        .map_err(|e| AppError::OAuth(format!("Rejected OAuth state: {}", e)))?;

    tracing::info!("Exchanging authorization code for tokens");

    let tokens = state.google.exchange_code(&code).await?;
    let profile = state.google.fetch_profile(&tokens.access_token).await?;
    let user = accounts::find_or_create_google_user(&state.db, &profile).await?;

    tracing::info!(user_id = %user.id, "Google login successful");

    let session = issue_session(&state.config, &user.id)?;
    let jar = jar.add(clear_nonce_cookie()).add(session);

    Ok((jar, Redirect::to("/")))
}
