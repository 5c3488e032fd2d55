//! Response bodies for the webhook endpoints.

use serde::Serialize;

use crate::domain::sync::PayloadIssue;

/// Acknowledgement of an accepted delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<bool>,
    pub processed: bool,
}

impl DeliveryResponse {
    /// First sighting of the key, applied.
    pub fn processed() -> Self {
        Self {
            ok: true,
            duplicate: None,
            processed: true,
        }
    }

    /// Key already recorded, nothing applied.
    pub fn duplicate() -> Self {
        Self {
            ok: true,
            duplicate: Some(true),
            processed: false,
        }
    }
}

/// Machine-readable failure; never carries internal detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: code.into(),
        }
    }
}

/// Schema violations, one entry per offending field.
#[derive(Debug, Clone, Serialize)]
pub struct InvalidPayloadResponse {
    pub error: &'static str,
    pub details: Vec<PayloadIssue>,
}

impl InvalidPayloadResponse {
    pub fn new(details: Vec<PayloadIssue>) -> Self {
        Self {
            error: "invalid_payload",
            details,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}
