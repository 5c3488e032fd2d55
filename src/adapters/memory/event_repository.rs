//! In-memory Event store keyed by campaign id.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::campaign::{Event, EventUpsert};
use crate::domain::foundation::{CampaignId, DomainError, Timestamp};
use crate::ports::EventRepository;

#[derive(Debug, Default, Clone)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<CampaignId, Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Event> {
        self.events.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn upsert(&self, upsert: EventUpsert) -> Result<Event, DomainError> {
        let now = Timestamp::now();
        let mut events = self.events.write().await;

        let event = match events.get_mut(&upsert.campaign_id) {
            Some(existing) => {
                existing.apply(upsert, now);
                existing.clone()
            }
            None => {
                let event = Event::from_upsert(upsert, now);
                events.insert(event.campaign_id.clone(), event.clone());
                event
            }
        };
        Ok(event)
    }

    async fn find_by_campaign_id(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Option<Event>, DomainError> {
        Ok(self.events.read().await.get(campaign_id).cloned())
    }
}
