// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod accounts;
pub mod google;
pub mod oauth_state;
pub mod password;

pub use google::{GoogleOAuthClient, GoogleProfile};
pub use oauth_state::{OAuthStateSigner, StateError};
