// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

/// Where notes and users are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Google Cloud Firestore (or its emulator).
    Firestore,
    /// Process-local maps. Data is lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(Self::Firestore),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Invalid("STORAGE_BACKEND", other.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Google OAuth client ID (public)
    pub google_client_id: String,
    /// Public origin of this service, e.g. `https://notes.example.com`
    pub base_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Persistence backend
    pub storage_backend: StorageBackend,
    /// Lifetime of a session token, in minutes
    pub session_ttl_minutes: u64,

    // --- Secrets ---
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let base_url = env::var("BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => StorageBackend::Firestore,
        };

        let session_ttl_minutes = match env::var("SESSION_TTL_MINUTES") {
            Ok(raw) => parse_session_ttl(raw)?,
            Err(_) => DEFAULT_SESSION_TTL_MINUTES,
        };

        let jwt_signing_key = env::var("SECRET_KEY")
            .map_err(|_| ConfigError::Missing("SECRET_KEY"))?
            .trim()
            .as_bytes()
            .to_vec();
        if jwt_signing_key.is_empty() {
            return Err(ConfigError::Invalid("SECRET_KEY", String::new()));
        }

        Ok(Self {
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_ID"))?,
            base_url,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            storage_backend,
            session_ttl_minutes,
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_SECRET"))?,
            jwt_signing_key,
        })
    }

    /// Deterministic configuration for tests: in-memory storage, fixed keys.
    pub fn test_default() -> Self {
        Self {
            google_client_id: "test_client_id".to_string(),
            base_url: "http://localhost:8080".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            storage_backend: StorageBackend::Memory,
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
            google_client_secret: "test_secret".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Redirect URI registered with Google for the OAuth callback.
    pub fn google_redirect_uri(&self) -> String {
        format!("{}/auth/google/callback", self.base_url)
    }

    /// Session lifetime in seconds, or `None` if the configured minutes overflow.
    pub fn session_ttl_secs(&self) -> Option<i64> {
        self.session_ttl_minutes
            .checked_mul(60)
            .and_then(|secs| i64::try_from(secs).ok())
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Session lifetime when `SESSION_TTL_MINUTES` is unset.
pub const DEFAULT_SESSION_TTL_MINUTES: u64 = 60;

/// Longest accepted session lifetime (one year).
pub const MAX_SESSION_TTL_MINUTES: u64 = 365 * 24 * 60;

fn parse_session_ttl(raw: String) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(minutes) if (1..=MAX_SESSION_TTL_MINUTES).contains(&minutes) => Ok(minutes),
        _ => Err(ConfigError::Invalid("SESSION_TTL_MINUTES", raw)),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
