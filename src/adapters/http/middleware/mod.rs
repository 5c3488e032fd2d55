//! HTTP middleware for webhook routes.

mod raw_body;
mod webhook_auth;

pub use raw_body::{capture_raw_body, BodyLimit, RawBody};
pub use webhook_auth::{
    webhook_auth, VerifierState, IDEMPOTENCY_KEY_HEADER, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
pub(crate) use webhook_auth::header_str;
