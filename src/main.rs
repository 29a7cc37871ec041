// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notekeeper web server
//!
//! Serves the personal notes application: password and Google sign-in,
//! then per-user note listing, search, editing and deletion.

use notekeeper::{config::Config, db::NoteDb, services::GoogleOAuthClient, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        base_url = %config.base_url,
        storage = ?config.storage_backend,
        "Starting Notekeeper"
    );

    let db = NoteDb::connect(&config).await?;
    let google = GoogleOAuthClient::new(&config)?;

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        google,
    });

    // Build router
    let app = notekeeper::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("notekeeper=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
