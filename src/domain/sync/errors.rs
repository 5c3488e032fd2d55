//! Errors raised while applying a delivery to domain records.
//!
//! `SyncError` is a tagged union; callers dispatch on `kind()` rather than on
//! the concrete variant when deciding how to respond.

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

use crate::domain::foundation::DomainError;

/// One schema violation, addressed by a dotted field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadIssue {
    pub path: String,
    pub message: String,
}

impl PayloadIssue {
    /// Creates an issue; an empty path addresses the document root.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() { "root".to_string() } else { path },
            message: message.into(),
        }
    }
}

impl fmt::Display for PayloadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every violation found in one payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid payload: {}", summarize(.issues))]
pub struct PayloadValidationError {
    pub issues: Vec<PayloadIssue>,
}

fn summarize(issues: &[PayloadIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A declared business rejection carrying its own response.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{code}: {message}")]
pub struct BusinessError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub body: Value,
}

impl BusinessError {
    /// The attendee references a campaign with no Event projection.
    pub fn campaign_not_found(campaign_id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "campaign_not_found",
            message: format!("Event with campaign {} not found", campaign_id),
            body: json!({ "ok": false, "error": "campaign_not_found" }),
        }
    }
}

/// Coarse classification used by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Business,
    Unexpected,
}

#[derive(Debug, Clone, Error)]
pub enum SyncError {
    #[error(transparent)]
    InvalidPayload(#[from] PayloadValidationError),

    #[error(transparent)]
    Business(#[from] BusinessError),

    #[error("infrastructure failure: {0}")]
    Infrastructure(#[from] DomainError),
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::InvalidPayload(_) => ErrorKind::Validation,
            SyncError::Business(_) => ErrorKind::Business,
            SyncError::Infrastructure(_) => ErrorKind::Unexpected,
        }
    }

    /// Detail recorded on the failed ledger row.
    pub fn ledger_detail(&self) -> String {
        match self {
            SyncError::InvalidPayload(err) => err.to_string(),
            SyncError::Business(err) => err.message.clone(),
            SyncError::Infrastructure(err) => err.to_string(),
        }
    }
}
