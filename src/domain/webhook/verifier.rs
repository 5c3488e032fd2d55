//! Webhook delivery authentication.
//!
//! Two mutually exclusive modes, chosen once from configuration:
//!
//! - **Bearer**: `Authorization: Bearer <token>`, the token resolved against a
//!   precomputed token → source-label table.
//! - **HMAC**: `X-Signature` is the hex HMAC-SHA256 of `"<X-Timestamp>.<raw body>"`
//!   under the shared secret, and the timestamp must lie within the tolerance
//!   window of the current time.

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::AuthFailure;

/// Default freshness window for signed deliveries (5 minutes).
pub const DEFAULT_TOLERANCE_SECS: u64 = 300;

/// Which authentication scheme the webhook routes enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Bearer,
    Hmac,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Bearer => "bearer",
            AuthMode::Hmac => "hmac",
        }
    }
}

/// A configured bearer token and the logical source it identifies.
#[derive(Debug, Clone)]
pub struct BearerToken {
    pub token: SecretString,
    pub source: Option<String>,
}

/// Result of a successful verification, attached to the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSource {
    pub mode: AuthMode,
    /// Source label of the bearer token, if one was configured.
    pub label: Option<String>,
}

/// Credential material pulled off one inbound request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeliveryCredentials<'a> {
    pub authorization: Option<&'a str>,
    pub signature: Option<&'a str>,
    pub timestamp: Option<&'a str>,
    /// Exact pre-parse body bytes; `None` when the transport did not capture them.
    pub raw_body: Option<&'a [u8]>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Bearer mode
// ════════════════════════════════════════════════════════════════════════════════

/// Resolves bearer tokens to their configured source label.
pub struct BearerTokenVerifier {
    tokens: HashMap<String, Option<String>>,
}

impl BearerTokenVerifier {
    /// Builds the lookup table once; later duplicates overwrite earlier ones.
    pub fn new(tokens: &[BearerToken]) -> Self {
        let tokens = tokens
            .iter()
            .map(|entry| (entry.token.expose_secret().clone(), entry.source.clone()))
            .collect();
        Self { tokens }
    }

    /// Verifies an `Authorization` header value, returning the source label.
    pub fn verify(&self, authorization: Option<&str>) -> Result<Option<String>, AuthFailure> {
        let header = authorization.ok_or(AuthFailure::MissingAuthorizationHeader)?;

        let (scheme, value) = header
            .split_once(' ')
            .ok_or(AuthFailure::InvalidAuthorizationHeader)?;
        if scheme.trim().is_empty() {
            return Err(AuthFailure::InvalidAuthorizationHeader);
        }
        if !scheme.trim().eq_ignore_ascii_case("bearer") {
            return Err(AuthFailure::InvalidAuthorizationScheme);
        }

        let token = value.trim();
        if token.is_empty() {
            return Err(AuthFailure::MissingToken);
        }

        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthFailure::InvalidToken)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// HMAC mode
// ════════════════════════════════════════════════════════════════════════════════

/// Verifier for timestamped HMAC-SHA256 signatures.
pub struct HmacSignatureVerifier {
    secret: SecretString,
    tolerance_secs: i64,
}

impl HmacSignatureVerifier {
    /// Creates a new verifier with the shared secret and freshness window.
    pub fn new(secret: SecretString, tolerance_secs: u64) -> Self {
        Self {
            secret,
            tolerance_secs: i64::try_from(tolerance_secs).unwrap_or(i64::MAX),
        }
    }

    /// Verifies against the current wall clock.
    pub fn verify(
        &self,
        signature: Option<&str>,
        timestamp: Option<&str>,
        raw_body: Option<&[u8]>,
    ) -> Result<(), AuthFailure> {
        self.verify_at(signature, timestamp, raw_body, chrono::Utc::now().timestamp())
    }

    /// Verifies against an explicit `now` (Unix seconds).
    ///
    /// # Verification Steps
    ///
    /// 1. Both headers must be present
    /// 2. The raw body must have been captured
    /// 3. The timestamp must be within the tolerance window
    /// 4. The hex digest must match, compared in constant time
    pub fn verify_at(
        &self,
        signature: Option<&str>,
        timestamp: Option<&str>,
        raw_body: Option<&[u8]>,
        now: i64,
    ) -> Result<(), AuthFailure> {
        let (signature, timestamp) = match (signature, timestamp) {
            (Some(s), Some(t)) => (s, t),
            _ => return Err(AuthFailure::MissingSignatureHeaders),
        };
        let raw_body = raw_body.ok_or(AuthFailure::MissingRawBody)?;

        self.validate_timestamp(timestamp, now)?;

        let expected = compute_signature(self.secret.expose_secret(), timestamp, raw_body);
        if !constant_time_compare(expected.as_bytes(), signature.as_bytes()) {
            return Err(AuthFailure::SignatureMismatch);
        }
        Ok(())
    }

    fn validate_timestamp(&self, timestamp: &str, now: i64) -> Result<(), AuthFailure> {
        let ts: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| AuthFailure::MalformedTimestamp)?;

        if now.saturating_sub(ts).saturating_abs() > self.tolerance_secs {
            return Err(AuthFailure::StaleTimestamp);
        }
        Ok(())
    }
}

/// Computes the lowercase hex HMAC-SHA256 of `"<timestamp>.<body>"`.
///
/// The body is rendered as UTF-8 (lossy) to match what senders sign.
pub fn compute_signature(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(body));

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(signed_payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time comparison; a length mismatch is rejected up front since
/// the length of a hex digest is not secret.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

// ════════════════════════════════════════════════════════════════════════════════
// Mode dispatch
// ════════════════════════════════════════════════════════════════════════════════

/// The configured verifier, built once at startup and shared immutably.
pub enum WebhookVerifier {
    Bearer(BearerTokenVerifier),
    Hmac(HmacSignatureVerifier),
}

impl WebhookVerifier {
    pub fn bearer(tokens: &[BearerToken]) -> Self {
        WebhookVerifier::Bearer(BearerTokenVerifier::new(tokens))
    }

    pub fn hmac(secret: SecretString, tolerance_secs: u64) -> Self {
        WebhookVerifier::Hmac(HmacSignatureVerifier::new(secret, tolerance_secs))
    }

    pub fn mode(&self) -> AuthMode {
        match self {
            WebhookVerifier::Bearer(_) => AuthMode::Bearer,
            WebhookVerifier::Hmac(_) => AuthMode::Hmac,
        }
    }

    /// Whether the transport must capture raw body bytes for this mode.
    pub fn needs_raw_body(&self) -> bool {
        matches!(self, WebhookVerifier::Hmac(_))
    }

    pub fn verify(
        &self,
        credentials: &DeliveryCredentials<'_>,
    ) -> Result<VerifiedSource, AuthFailure> {
        match self {
            WebhookVerifier::Bearer(verifier) => {
                let label = verifier.verify(credentials.authorization)?;
                Ok(VerifiedSource {
                    mode: AuthMode::Bearer,
                    label,
                })
            }
            WebhookVerifier::Hmac(verifier) => {
                verifier.verify(
                    credentials.signature,
                    credentials.timestamp,
                    credentials.raw_body,
                )?;
                Ok(VerifiedSource {
                    mode: AuthMode::Hmac,
                    label: None,
                })
            }
        }
    }
}
