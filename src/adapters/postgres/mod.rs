//! PostgreSQL adapters - Database implementations for the record store ports.
//!
//! - `PostgresDeliveryRepository` - Idempotency ledger (`webhook_deliveries`)
//! - `PostgresEventRepository` - Event projections (`events`)
//! - `PostgresMemberRepository` - CRM persons (`members`)
//! - `PostgresRegistrationRepository` - Registrations (`registrations`)
//!
//! Every keyed write is a single `INSERT ... ON CONFLICT` statement so that
//! concurrent deliveries serialize on the table's unique constraint.

mod delivery_repository;
mod event_repository;
mod member_repository;
mod registration_repository;

pub use delivery_repository::PostgresDeliveryRepository;
pub use event_repository::PostgresEventRepository;
pub use member_repository::PostgresMemberRepository;
pub use registration_repository::PostgresRegistrationRepository;
