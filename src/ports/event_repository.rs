//! EventRepository port - Event projections keyed by CRM campaign id.

use async_trait::async_trait;

use crate::domain::campaign::{Event, EventUpsert};
use crate::domain::foundation::{CampaignId, DomainError};

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Creates the event or fully replaces its mutable fields.
    ///
    /// Must be a single atomic upsert on `campaign_id`: concurrent calls for
    /// the same campaign converge on one row, last write wins.
    async fn upsert(&self, upsert: EventUpsert) -> Result<Event, DomainError>;

    async fn find_by_campaign_id(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Option<Event>, DomainError>;
}
