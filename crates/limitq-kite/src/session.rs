//! Explicit session state for the venue API.
//!
//! The session token is a plain value produced once at startup and handed
//! to [`crate::KiteClient`]; nothing here is process-global.

use sha2::{Digest, Sha256};

/// API application credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

/// An established venue session: API key plus the access token issued for
/// the current trading day.
#[derive(Debug, Clone)]
pub struct Session {
    pub api_key: String,
    pub access_token: String,
}

impl Session {
    pub fn new(api_key: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            access_token: access_token.into(),
        }
    }

    /// Value for the `Authorization` header.
    pub(crate) fn auth_header(&self) -> String {
        format!("token {}:{}", self.api_key, self.access_token)
    }
}

/// Interactive login URL for obtaining a one-time request token.
pub fn login_url(login_base: &str, api_key: &str) -> String {
    format!("{login_base}?v=3&api_key={api_key}")
}

/// Checksum required by the session-token exchange endpoint:
/// hex-encoded SHA-256 over `api_key + request_token + api_secret`.
pub fn session_checksum(api_key: &str, request_token: &str, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hasher.update(request_token.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
