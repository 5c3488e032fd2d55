//! Application layer - handlers that coordinate domain logic over ports.

pub mod handlers;

pub use handlers::{
    ApplyAttendeeUpsertHandler, ApplyCampaignUpsertHandler, DeliveryError, DeliveryOutcome,
    IdempotencyLedger, ProcessDeliveryCommand, ProcessDeliveryHandler, RecordedDelivery,
};
