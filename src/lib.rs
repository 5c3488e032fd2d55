//! Campaign Ingest - authenticated, idempotent CRM webhook ingestion.
//!
//! Campaign and attendee deliveries are verified (bearer token or HMAC
//! signature), recorded in an idempotency ledger keyed on the caller's
//! `Idempotency-Key`, and projected onto Events, Members and Registrations.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
