//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over ports.

pub mod ingest;

pub use ingest::{
    ApplyAttendeeUpsertHandler, ApplyCampaignUpsertHandler, DeliveryError, DeliveryOutcome,
    IdempotencyLedger, ProcessDeliveryCommand, ProcessDeliveryHandler, RecordedDelivery,
};
