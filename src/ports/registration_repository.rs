//! RegistrationRepository port - registrations keyed by (event, member).

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::registration::{Registration, RegistrationUpsert};

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Creates the registration or replaces its mutable fields, atomically
    /// on the `(event_id, member_id)` pair.
    async fn upsert(&self, upsert: RegistrationUpsert) -> Result<Registration, DomainError>;
}
