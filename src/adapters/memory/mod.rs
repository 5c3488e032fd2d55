//! In-memory record store adapters.
//!
//! Each store holds its rows behind a tokio `RwLock` and performs every
//! keyed insert or upsert under a single write guard, mirroring the unique
//! constraints of the PostgreSQL schema. Wired programmatically for tests and
//! embedding; not selectable from configuration.

mod delivery_repository;
mod event_repository;
mod member_repository;
mod registration_repository;

pub use delivery_repository::InMemoryDeliveryRepository;
pub use event_repository::InMemoryEventRepository;
pub use member_repository::InMemoryMemberRepository;
pub use registration_repository::InMemoryRegistrationRepository;
