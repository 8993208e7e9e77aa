//! Identity assertion verification.
//!
//! # Responsibilities
//! - Read the OA token and staff name from the request
//! - Check the token is present, well-formed, correctly signed, not expired
//! - Check the principal against the configured operator list
//!
//! # Design Decisions
//! - Default-deny: the guard only ever widens access on a fully valid
//!   assertion; every failure collapses to a decision, never a panic
//! - Error responses never echo the raw assertion
//! - The token transport (header or cookie) is the identity provider's
//!   contract; both are accepted here

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::HeaderMap;
use sha2::{Digest, Sha256};

use crate::config::AuthConfig;

/// Header carrying the signed OA token.
pub const X_OA_TOKEN: &str = "x-oa-token";
/// Header carrying the principal (staff name).
pub const X_STAFF_NAME: &str = "x-staff-name";
/// Cookie name used as the alternative token transport.
pub const OA_TOKEN_COOKIE: &str = "oa-token";

/// Outcome of verifying one request's identity assertion.
///
/// Computed at most once per request, never persisted beyond it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthDecision {
    /// The verified principal. None when verification failed outright.
    pub principal: Option<String>,
    /// Whether the request may proceed to the backend.
    pub allowed: bool,
}

impl AuthDecision {
    fn unauthenticated() -> Self {
        Self {
            principal: None,
            allowed: false,
        }
    }

    fn forbidden(principal: String) -> Self {
        Self {
            principal: Some(principal),
            allowed: false,
        }
    }

    fn allowed(principal: String) -> Self {
        Self {
            principal: Some(principal),
            allowed: true,
        }
    }
}

/// Verifies identity assertions against the configured policy.
pub struct AuthGuard {
    secret: String,
    operators: Vec<String>,
}

impl AuthGuard {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            operators: config.operators.clone(),
        }
    }

    /// Verify the assertion carried by `headers`.
    ///
    /// `principal == None` means the caller could not be identified at all;
    /// `Some` with `allowed == false` means a valid identity lacking
    /// permission for gated operations.
    pub fn verify(&self, headers: &HeaderMap) -> AuthDecision {
        let Some(staff) = header_str(headers, X_STAFF_NAME) else {
            return AuthDecision::unauthenticated();
        };
        let Some(token) = self.extract_token(headers) else {
            return AuthDecision::unauthenticated();
        };

        // Token format: "<expiry-unix>:<hex sha256(staff:expiry:secret)>"
        let Some((expiry_str, signature)) = token.split_once(':') else {
            return AuthDecision::unauthenticated();
        };
        let Ok(expiry) = expiry_str.parse::<u64>() else {
            return AuthDecision::unauthenticated();
        };

        if expiry < now_unix() {
            return AuthDecision::unauthenticated();
        }

        let expected = sign(staff, expiry, &self.secret);
        if expected != signature {
            return AuthDecision::unauthenticated();
        }

        if !self.operators.is_empty() && !self.operators.iter().any(|o| o == staff) {
            return AuthDecision::forbidden(staff.to_string());
        }

        AuthDecision::allowed(staff.to_string())
    }

    /// Token comes from the X-OA-Token header or the oa-token cookie.
    fn extract_token(&self, headers: &HeaderMap) -> Option<String> {
        if let Some(token) = header_str(headers, X_OA_TOKEN) {
            return Some(token.to_string());
        }
        let cookies = header_str(headers, "cookie")?;
        cookies.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == OA_TOKEN_COOKIE).then(|| value.to_string())
        })
    }
}

/// Compute the expected token signature for a principal and expiry.
///
/// Also used by tests and tooling to mint valid tokens.
pub fn sign(principal: &str, expiry: u64, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}:{}", principal, expiry, secret).as_bytes());
    hex::encode(hasher.finalize())
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
