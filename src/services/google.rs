// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth 2.0 client (authorization code flow).
//!
//! Handles:
//! - Building the consent URL
//! - Exchanging the authorization code for an access token
//! - Fetching the signed-in user's profile

use crate::config::Config;
use crate::error::AppError;
use serde::Deserialize;
use std::time::Duration;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPES: &str = "openid email profile";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Token endpoint response. Only the access token is used.
#[derive(Debug, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Profile returned by the userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
}

/// Google OAuth client.
#[derive(Clone)]
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

impl GoogleOAuthClient {
    /// Create a client against Google's production endpoints.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Self::with_endpoints(config, AUTH_URL, TOKEN_URL, USERINFO_URL)
    }

    /// Create a client against custom endpoints (used for local fakes).
    pub fn with_endpoints(
        config: &Config,
        auth_url: &str,
        token_url: &str,
        userinfo_url: &str,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http,
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.google_redirect_uri(),
            auth_url: auth_url.to_string(),
            token_url: token_url.to_string(),
            userinfo_url: userinfo_url.to_string(),
        })
    }

    /// URL of the Google consent screen carrying our signed `state`.
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&prompt=select_account",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<GoogleTokenResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::OAuth(format!("Token request failed: {}", e)))?;

        check_response_json(response, "token exchange").await
    }

    /// Fetch the profile for an access token.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, AppError> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::OAuth(format!("Userinfo request failed: {}", e)))?;

        let profile: GoogleProfile = check_response_json(response, "userinfo").await?;

        if profile.email_verified == Some(false) {
            return Err(AppError::OAuth("Google email is not verified".to_string()));
        }

        Ok(profile)
    }
}

/// Check response status and parse JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
    what: &str,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::OAuth(format!(
            "Google {} returned HTTP {}: {}",
            what, status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::OAuth(format!("Invalid Google {} response: {}", what, e)))
}
