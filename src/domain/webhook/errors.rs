//! Authentication failures for inbound webhook deliveries.
//!
//! Each failure carries three views: a fine-grained `reason()` for the
//! structured log, a coarse wire `code()` for the response body, and the HTTP
//! status. HMAC failures deliberately collapse to one wire code so callers
//! cannot tell a stale timestamp from a bad digest.

use axum::http::StatusCode;
use thiserror::Error;

/// Reasons a delivery failed authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("Authorization header missing")]
    MissingAuthorizationHeader,

    #[error("Authorization header is not '<scheme> <value>'")]
    InvalidAuthorizationHeader,

    #[error("Authorization scheme is not Bearer")]
    InvalidAuthorizationScheme,

    #[error("Bearer token is empty")]
    MissingToken,

    #[error("Bearer token not recognised")]
    InvalidToken,

    #[error("Signature or timestamp header missing")]
    MissingSignatureHeaders,

    #[error("Timestamp is not an integer")]
    MalformedTimestamp,

    #[error("Timestamp outside tolerance window")]
    StaleTimestamp,

    #[error("Signature mismatch")]
    SignatureMismatch,

    #[error("Raw request body was not captured")]
    MissingRawBody,
}

impl AuthFailure {
    /// Machine-readable code returned to the caller.
    pub fn code(&self) -> &'static str {
        match self {
            AuthFailure::MissingAuthorizationHeader => "missing_authorization_header",
            AuthFailure::InvalidAuthorizationHeader => "invalid_authorization_header",
            AuthFailure::InvalidAuthorizationScheme => "invalid_authorization_scheme",
            AuthFailure::MissingToken => "missing_token",
            AuthFailure::InvalidToken => "invalid_token",
            AuthFailure::MissingSignatureHeaders
            | AuthFailure::MalformedTimestamp
            | AuthFailure::StaleTimestamp
            | AuthFailure::SignatureMismatch => "invalid_signature",
            AuthFailure::MissingRawBody => "missing_raw_body",
        }
    }

    /// Fine-grained reason code for logs only.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthFailure::MissingSignatureHeaders => "missing_signature_headers",
            AuthFailure::MalformedTimestamp => "malformed_timestamp",
            AuthFailure::StaleTimestamp => "stale_timestamp",
            AuthFailure::SignatureMismatch => "signature_mismatch",
            other => other.code(),
        }
    }

    /// Maps the failure to an HTTP status code.
    ///
    /// Header shape problems and the raw-body misconfiguration are 400; every
    /// credential problem is 401.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthFailure::InvalidAuthorizationHeader
            | AuthFailure::InvalidAuthorizationScheme
            | AuthFailure::MissingRawBody => StatusCode::BAD_REQUEST,

            AuthFailure::MissingAuthorizationHeader
            | AuthFailure::MissingToken
            | AuthFailure::InvalidToken
            | AuthFailure::MissingSignatureHeaders
            | AuthFailure::MalformedTimestamp
            | AuthFailure::StaleTimestamp
            | AuthFailure::SignatureMismatch => StatusCode::UNAUTHORIZED,
        }
    }
}
