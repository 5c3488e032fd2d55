//! In-memory Registration store keyed by (event, member).

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, EventId, MemberId, Timestamp};
use crate::domain::registration::{Registration, RegistrationUpsert};
use crate::ports::RegistrationRepository;

#[derive(Debug, Default, Clone)]
pub struct InMemoryRegistrationRepository {
    registrations: Arc<RwLock<HashMap<(EventId, MemberId), Registration>>>,
}

impl InMemoryRegistrationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Registration> {
        self.registrations.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryRegistrationRepository {
    async fn upsert(&self, upsert: RegistrationUpsert) -> Result<Registration, DomainError> {
        let now = Timestamp::now();
        let key = (upsert.event_id, upsert.member_id.clone());
        let mut registrations = self.registrations.write().await;

        let registration = match registrations.get_mut(&key) {
            Some(existing) => {
                existing.apply(upsert, now);
                existing.clone()
            }
            None => {
                let registration = Registration::from_upsert(upsert, now);
                registrations.insert(key, registration.clone());
                registration
            }
        };
        Ok(registration)
    }
}
