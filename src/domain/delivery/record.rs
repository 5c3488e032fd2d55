//! Delivery ledger record and its lifecycle.
//!
//! A `DeliveryRecord` is written once per accepted webhook delivery. The
//! idempotency key is the only dedup axis; uniqueness is enforced by the
//! storage layer, never pre-checked in application code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    DeliveryId, StateMachine, Timestamp, ValidationError,
};

/// Which webhook route a delivery arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliverySource {
    CampaignUpsert,
    AttendeeUpsert,
}

impl DeliverySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliverySource::CampaignUpsert => "campaign_upsert",
            DeliverySource::AttendeeUpsert => "attendee_upsert",
        }
    }
}

impl fmt::Display for DeliverySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliverySource {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "campaign_upsert" => Ok(DeliverySource::CampaignUpsert),
            "attendee_upsert" => Ok(DeliverySource::AttendeeUpsert),
            other => Err(ValidationError::invalid_format(
                "source",
                format!("unknown delivery source '{}'", other),
            )),
        }
    }
}

/// Outcome state of a ledger row.
///
/// `Accepted -> Processed` or `Accepted -> Failed`; both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Accepted,
    Processed,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Accepted => "accepted",
            DeliveryStatus::Processed => "processed",
            DeliveryStatus::Failed => "failed",
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(DeliveryStatus::Accepted),
            "processed" => Ok(DeliveryStatus::Processed),
            "failed" => Ok(DeliveryStatus::Failed),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown delivery status '{}'", other),
            )),
        }
    }
}

impl StateMachine for DeliveryStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DeliveryStatus::*;
        matches!((self, target), (Accepted, Processed) | (Accepted, Failed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DeliveryStatus::*;
        match self {
            Accepted => vec![Processed, Failed],
            Processed | Failed => vec![],
        }
    }
}

/// One row of the idempotency ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryRecord {
    pub id: DeliveryId,
    pub idempotency_key: String,
    pub source: DeliverySource,
    /// Stored verbatim for audit and replay diagnosis.
    pub payload: serde_json::Value,
    pub status: DeliveryStatus,
    pub error: Option<String>,
    pub created_at: Timestamp,
    pub processed_at: Option<Timestamp>,
}

impl DeliveryRecord {
    /// Creates a fresh `accepted` record for a first-seen delivery attempt.
    pub fn accept(
        source: DeliverySource,
        idempotency_key: impl Into<String>,
        payload: serde_json::Value,
    ) -> Result<Self, ValidationError> {
        let idempotency_key = idempotency_key.into();
        if idempotency_key.trim().is_empty() {
            return Err(ValidationError::empty_field("idempotency_key"));
        }
        Ok(Self {
            id: DeliveryId::new(),
            idempotency_key,
            source,
            payload,
            status: DeliveryStatus::Accepted,
            error: None,
            created_at: Timestamp::now(),
            processed_at: None,
        })
    }

    /// Marks the delivery processed.
    ///
    /// Calling this on an already-processed record is a no-op; calling it on
    /// a failed record is rejected.
    pub fn mark_processed(&mut self, at: Timestamp) -> Result<(), ValidationError> {
        if self.status == DeliveryStatus::Processed {
            return Ok(());
        }
        self.status = self.status.transition_to(DeliveryStatus::Processed)?;
        self.processed_at = Some(at);
        Ok(())
    }

    /// Marks the delivery failed with the given error detail.
    ///
    /// Calling this on an already-failed record keeps the first error.
    pub fn mark_failed(
        &mut self,
        error: impl Into<String>,
        at: Timestamp,
    ) -> Result<(), ValidationError> {
        if self.status == DeliveryStatus::Failed {
            return Ok(());
        }
        self.status = self.status.transition_to(DeliveryStatus::Failed)?;
        self.error = Some(error.into());
        self.processed_at = Some(at);
        Ok(())
    }
}
