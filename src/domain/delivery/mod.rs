//! Delivery module - the idempotency ledger's record type.

mod record;

pub use record::{DeliveryRecord, DeliverySource, DeliveryStatus};
