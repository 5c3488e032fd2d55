//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, errors, state machine)
//! - `webhook` - Bearer and HMAC authentication of inbound deliveries
//! - `delivery` - Idempotency ledger record and its lifecycle
//! - `campaign` - Event projection of CRM campaigns
//! - `registration` - Members, registrations and the status normalizer
//! - `sync` - Validated delivery payloads and processing errors

pub mod campaign;
pub mod delivery;
pub mod foundation;
pub mod registration;
pub mod sync;
pub mod webhook;
