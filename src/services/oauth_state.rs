// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed OAuth `state` parameter.
//!
//! The state is `base64url("nonce|timestamp_hex|hmac_hex")`. The same nonce is
//! stored in a short-lived cookie, so a callback is only accepted from the
//! browser that started the flow, and only within [`STATE_MAX_AGE_SECS`].

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// How long a login attempt may take between redirect and callback.
pub const STATE_MAX_AGE_SECS: u64 = 10 * 60;

const HKDF_INFO: &[u8] = b"notekeeper/oauth-state/v1";

/// Why a returned state was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("malformed state")]
    Malformed,
    #[error("state signature mismatch")]
    BadSignature,
    #[error("state expired")]
    Expired,
    #[error("state nonce does not match cookie")]
    NonceMismatch,
}

/// Signs and verifies OAuth state values.
#[derive(Clone)]
pub struct OAuthStateSigner {
    mac: HmacSha256,
}

impl OAuthStateSigner {
    /// Derive a state key from the session secret, so one secret serves both.
    pub fn new(secret: &[u8]) -> anyhow::Result<Self> {
        let mut key = [0u8; 32];
        Hkdf::<Sha256>::new(None, secret)
            .expand(HKDF_INFO, &mut key)
            .map_err(|e| anyhow::anyhow!("HKDF expand failed: {}", e))?;
        let mac = HmacSha256::new_from_slice(&key)
            .map_err(|e| anyhow::anyhow!("HMAC init failed: {}", e))?;
        Ok(Self { mac })
    }

    fn mac(&self, payload: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac
    }

    /// Produce a state value binding `nonce` to `issued_at` (Unix seconds).
    pub fn sign(&self, nonce: &str, issued_at: u64) -> String {
        let payload = format!("{}|{:x}", nonce, issued_at);
        let signature = hex::encode(self.mac(&payload).finalize().into_bytes());
        URL_SAFE_NO_PAD.encode(format!("{}|{}", payload, signature))
    }

    /// Verify a returned state against the nonce cookie at time `now`.
    pub fn verify(&self, state: &str, expected_nonce: &str, now: u64) -> Result<(), StateError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(state)
            .map_err(|_| StateError::Malformed)?;
        let decoded = String::from_utf8(bytes).map_err(|_| StateError::Malformed)?;

        let parts: Vec<&str> = decoded.splitn(3, '|').collect();
        let [nonce, timestamp_hex, signature_hex] = parts[..] else {
            return Err(StateError::Malformed);
        };

        let signature = hex::decode(signature_hex).map_err(|_| StateError::Malformed)?;
        self.mac(&format!("{}|{}", nonce, timestamp_hex))
            .verify_slice(&signature)
            .map_err(|_| StateError::BadSignature)?;

        let issued_at = u64::from_str_radix(timestamp_hex, 16).map_err(|_| StateError::Malformed)?;
        if now.saturating_sub(issued_at) > STATE_MAX_AGE_SECS || issued_at > now + 60 {
            return Err(StateError::Expired);
        }

        if !bool::from(nonce.as_bytes().ct_eq(expected_nonce.as_bytes())) {
            return Err(StateError::NonceMismatch);
        }

        Ok(())
    }
}
