//! Ingest handlers.
//!
//! - `IdempotencyLedger` - insert-first delivery recording
//! - `ApplyCampaignUpsertHandler` - campaign payload to Event
//! - `ApplyAttendeeUpsertHandler` - attendee payload to Member and Registration
//! - `ProcessDeliveryHandler` - per-delivery orchestration over the above

mod apply_attendee_upsert;
mod apply_campaign_upsert;
mod idempotency_ledger;
mod process_delivery;

pub use apply_attendee_upsert::ApplyAttendeeUpsertHandler;
pub use apply_campaign_upsert::ApplyCampaignUpsertHandler;
pub use idempotency_ledger::{IdempotencyLedger, RecordedDelivery};
pub use process_delivery::{
    DeliveryError, DeliveryOutcome, ProcessDeliveryCommand, ProcessDeliveryHandler,
};
