//! ApplyCampaignUpsertHandler - projects a campaign delivery onto an Event.

use std::sync::Arc;

use chrono_tz::Tz;
use serde_json::Value;

use crate::domain::campaign::Event;
use crate::domain::sync::{CampaignUpsertPayload, SyncError};
use crate::ports::{EventRepository, HtmlSanitizer};

pub struct ApplyCampaignUpsertHandler {
    events: Arc<dyn EventRepository>,
    sanitizer: Arc<dyn HtmlSanitizer>,
    business_tz: Tz,
}

impl ApplyCampaignUpsertHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        sanitizer: Arc<dyn HtmlSanitizer>,
        business_tz: Tz,
    ) -> Self {
        Self {
            events,
            sanitizer,
            business_tz,
        }
    }

    /// Validates the payload and creates or fully replaces the Event.
    pub async fn handle(&self, payload: &Value) -> Result<Event, SyncError> {
        let parsed = CampaignUpsertPayload::parse(payload, &self.business_tz)?;
        let campaign = parsed.campaign;

        tracing::debug!(
            campaign_id = %campaign.id,
            version = parsed.version,
            starts_local = %campaign.start,
            "Applying campaign upsert"
        );

        let description = self.sanitizer.sanitize(campaign.description.as_deref());
        let event = self
            .events
            .upsert(campaign.into_event_upsert(description))
            .await?;

        Ok(event)
    }
}
