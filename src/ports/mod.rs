//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Record Store Ports
//!
//! - `DeliveryRepository` - Idempotency ledger with atomic insert-if-absent
//! - `EventRepository` - Event projections, upserted on campaign id
//! - `MemberRepository` - CRM persons, upserted on person id
//! - `RegistrationRepository` - Registrations, upserted on (event, member)
//!
//! ## Content Ports
//!
//! - `HtmlSanitizer` - Cleans campaign descriptions

mod delivery_repository;
mod event_repository;
mod html_sanitizer;
mod member_repository;
mod registration_repository;

pub use delivery_repository::{DeliveryRepository, InsertOutcome};
pub use event_repository::EventRepository;
pub use html_sanitizer::HtmlSanitizer;
pub use member_repository::MemberRepository;
pub use registration_repository::RegistrationRepository;
