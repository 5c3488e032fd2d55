//! Webhook module - authentication of inbound deliveries.

mod errors;
mod verifier;

pub use errors::AuthFailure;
pub use verifier::{
    compute_signature, AuthMode, BearerToken, BearerTokenVerifier, DeliveryCredentials,
    HmacSignatureVerifier, VerifiedSource, WebhookVerifier, DEFAULT_TOLERANCE_SECS,
};
