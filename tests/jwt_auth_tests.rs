// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token tests.
//!
//! Tokens are stateless, so everything rests on the signature and expiry
//! checks. These tests forge, expire and re-key tokens and confirm both the
//! verifier and the HTTP layer refuse them.

mod common;

use axum::http::StatusCode;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use notekeeper::error::AppError;
use notekeeper::middleware::auth::{create_jwt, verify_jwt, Claims};
use notekeeper::time_utils::unix_now;
use tower::ServiceExt;

const KEY: &[u8] = b"test_jwt_key_32_bytes_minimum!!";

fn token_with_times(sub: &str, iat: u64, exp: u64, key: &[u8]) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        iat: iat as usize,
        exp: exp as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(key),
    )
    .expect("Failed to create JWT")
}

/// Swap the `sub` claim while keeping the original signature.
fn tamper_subject(token: &str, new_sub: &str) -> String {
    let parts: Vec<&str> = token.split('.').collect();
    assert_eq!(parts.len(), 3);

    let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
    let mut claims: serde_json::Value = serde_json::from_slice(&payload).unwrap();
    claims["sub"] = serde_json::Value::String(new_sub.to_string());
    let forged = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());

    format!("{}.{}.{}", parts[0], forged, parts[2])
}

#[test]
fn test_jwt_roundtrip() {
    let token = create_jwt("user-123", KEY, 3600).unwrap();
    let claims = verify_jwt(&token, KEY).expect("fresh token must verify");

    assert_eq!(claims.sub, "user-123");
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_tampered_payload_rejected() {
    let token = create_jwt("alice", KEY, 3600).unwrap();
    let forged = tamper_subject(&token, "bob");

    assert!(matches!(
        verify_jwt(&forged, KEY),
        Err(AppError::InvalidToken)
    ));
}

#[test]
fn test_expired_token_rejected() {
    let now = unix_now();
    let token = token_with_times("user-1", now - 7200, now - 60, KEY);

    assert!(matches!(verify_jwt(&token, KEY), Err(AppError::InvalidToken)));
}

#[test]
fn test_wrong_key_rejected() {
    let token = create_jwt("user-1", b"some_other_signing_key_entirely", 3600).unwrap();
    assert!(matches!(verify_jwt(&token, KEY), Err(AppError::InvalidToken)));
}

#[test]
fn test_garbage_rejected() {
    for token in ["", "not-a-jwt", "a.b.c"] {
        assert!(
            matches!(verify_jwt(token, KEY), Err(AppError::InvalidToken)),
            "token {:?} should be rejected",
            token
        );
    }
}

#[test]
fn test_none_algorithm_rejected() {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        format!(r#"{{"sub":"user-1","iat":{},"exp":{}}}"#, unix_now(), unix_now() + 3600)
            .as_bytes(),
    );
    let token = format!("{}.{}.", header, payload);

    assert!(matches!(verify_jwt(&token, KEY), Err(AppError::InvalidToken)));
}

#[tokio::test]
async fn test_forged_cookie_redirects_and_clears() {
    let (app, state) = common::create_test_app();
    let alice = common::seed_user(&state, "alice", "alice@example.com", "pw-alice").await;
    let bob = common::seed_user(&state, "bob", "bob@example.com", "pw-bob").await;

    let token = create_jwt(&alice.id, &state.config.jwt_signing_key, 3600).unwrap();
    let forged = tamper_subject(&token, &bob.id);

    let response = app
        .oneshot(common::get("/", Some(&format!("access_token={}", forged))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), "/login");

    let cleared = common::find_set_cookie(&response, "access_token")
        .expect("stale cookie should be cleared");
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_expired_cookie_redirects() {
    let (app, state) = common::create_test_app();
    let alice = common::seed_user(&state, "alice", "alice@example.com", "pw-alice").await;

    let now = unix_now();
    let token = token_with_times(&alice.id, now - 7200, now - 1, &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::get("/", Some(&format!("access_token={}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), "/login");
}

#[tokio::test]
async fn test_token_for_unknown_user_redirects() {
    let (app, state) = common::create_test_app();
    let cookie = common::session_cookie_for(&state, "00000000-0000-4000-8000-000000000000");

    let response = app.oneshot(common::get("/", Some(&cookie))).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), "/login");
}

#[tokio::test]
async fn test_bearer_header_accepted() {
    let (app, state) = common::create_test_app();
    let alice = common::seed_user(&state, "alice", "alice@example.com", "pw-alice").await;
    let token = create_jwt(&alice.id, &state.config.jwt_signing_key, 3600).unwrap();

    let request = axum::http::Request::builder()
        .uri("/")
        .header("Authorization", format!("Bearer {}", token))
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
