// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use notekeeper::config::Config;
use notekeeper::db::NoteDb;
use notekeeper::middleware::auth::create_jwt;
use notekeeper::models::User;
use notekeeper::routes::create_router;
use notekeeper::services::{accounts, GoogleOAuthClient};
use notekeeper::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test app backed by the in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let google = GoogleOAuthClient::new(&config).expect("Failed to build Google client");
    create_test_app_with_google(config, google)
}

/// Create a test app with a caller-supplied Google client (e.g. pointed at a local fake).
#[allow(dead_code)]
pub fn create_test_app_with_google(
    config: Config,
    google: GoogleOAuthClient,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config,
        db: NoteDb::new_memory(),
        google,
    });

    (create_router(state.clone()), state)
}

/// Register a password user directly through the accounts service.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState, username: &str, email: &str, password: &str) -> User {
    accounts::register(&state.db, username, email, password)
        .await
        .expect("Failed to seed user")
}

/// `Cookie` header value carrying a valid session for `user_id`.
#[allow(dead_code)]
pub fn session_cookie_for(state: &AppState, user_id: &str) -> String {
    let token = create_jwt(user_id, &state.config.jwt_signing_key, 3600)
        .expect("Failed to create JWT");
    format!("access_token={}", token)
}

/// Build a GET request, optionally with a `Cookie` header.
#[allow(dead_code)]
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Build a form-encoded POST request, optionally with a `Cookie` header.
#[allow(dead_code)]
pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Read a response body as UTF-8 text.
#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// All `Set-Cookie` header values on a response.
#[allow(dead_code)]
pub fn set_cookies<B>(response: &Response<B>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// The `Set-Cookie` header for cookie `name`, if any.
#[allow(dead_code)]
pub fn find_set_cookie<B>(response: &Response<B>, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    set_cookies(response)
        .into_iter()
        .find(|c| c.starts_with(&prefix))
}

/// Value part of a `Set-Cookie` header (`name=value; attrs` -> `value`).
#[allow(dead_code)]
pub fn cookie_value(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

/// `Location` header of a redirect.
#[allow(dead_code)]
pub fn location<B>(response: &Response<B>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string()
}
