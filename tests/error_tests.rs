// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error-to-response mapping tests.

mod common;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use notekeeper::error::AppError;
use notekeeper::models::parse_id;

#[test]
fn test_status_codes() {
    let cases = [
        (AppError::Unauthorized, StatusCode::SEE_OTHER),
        (AppError::InvalidToken, StatusCode::SEE_OTHER),
        (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
        (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
        (AppError::OAuth("x".into()), StatusCode::BAD_REQUEST),
        (AppError::Conflict("x".into()), StatusCode::CONFLICT),
        (AppError::Database("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        (
            AppError::Internal(anyhow::anyhow!("x")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, expected) in cases {
        let label = error.to_string();
        assert_eq!(error.into_response().status(), expected, "{}", label);
    }
}

#[test]
fn test_unauthorized_redirects_to_login() {
    let response = AppError::Unauthorized.into_response();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), "/login");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[test]
fn test_invalid_token_clears_cookie() {
    let response = AppError::InvalidToken.into_response();
    assert_eq!(common::location(&response), "/login");

    let cleared = common::find_set_cookie(&response, "access_token").expect("removal cookie");
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_internal_details_not_leaked() {
    let response = AppError::Database("connection refused to 10.0.0.5:8681".into()).into_response();
    let body = common::body_string(response).await;
    assert!(!body.contains("10.0.0.5"));
    assert!(body.contains("Something went wrong"));

    let response = AppError::Internal(anyhow::anyhow!("secret stack detail")).into_response();
    let body = common::body_string(response).await;
    assert!(!body.contains("secret stack detail"));
}

#[tokio::test]
async fn test_oauth_details_not_leaked() {
    let response = AppError::OAuth("token endpoint said: invalid_client abc".into()).into_response();
    let body = common::body_string(response).await;
    assert!(!body.contains("invalid_client"));
    assert!(body.contains("Google authentication failed"));
}

#[tokio::test]
async fn test_user_facing_messages_rendered() {
    let response = AppError::NotFound("Note not found".into()).into_response();
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
    let body = common::body_string(response).await;
    assert!(body.contains("Note not found"));
    assert!(body.contains("404"));
}

#[test]
fn test_parse_id_errors_are_bad_request() {
    for raw in ["", "123", "not-a-uuid", "../etc/passwd"] {
        let err = parse_id(raw).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{:?}", raw);
    }
}
