// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notekeeper: personal notes behind a signed session cookie.
//!
//! Users sign up with a password or sign in with Google, then keep a private
//! list of notes. Every note query is scoped to the authenticated owner.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod views;

use config::Config;
use db::NoteDb;
use services::GoogleOAuthClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: NoteDb,
    pub google: GoogleOAuthClient,
}
