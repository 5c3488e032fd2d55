//! ApplyAttendeeUpsertHandler - projects an attendee delivery onto a
//! Member and its Registration for the referenced Event.

use std::sync::Arc;

use chrono_tz::Tz;
use serde_json::Value;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::registration::{
    normalize_status, parse_check_in, RegistrationStatus, RegistrationUpsert,
    RegistrationWithEvent,
};
use crate::domain::sync::{AttendeeUpsertPayload, BusinessError, SyncError};
use crate::ports::{EventRepository, MemberRepository, RegistrationRepository};

pub struct ApplyAttendeeUpsertHandler {
    events: Arc<dyn EventRepository>,
    members: Arc<dyn MemberRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    business_tz: Tz,
}

impl ApplyAttendeeUpsertHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        members: Arc<dyn MemberRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        business_tz: Tz,
    ) -> Self {
        Self {
            events,
            members,
            registrations,
            business_tz,
        }
    }

    pub async fn handle(&self, payload: &Value) -> Result<RegistrationWithEvent, SyncError> {
        let parsed = AttendeeUpsertPayload::parse(payload, &self.business_tz)?;

        // Resolve the event before touching members so an unknown campaign
        // leaves no rows behind.
        let event = self
            .events
            .find_by_campaign_id(&parsed.campaign_id)
            .await?
            .ok_or_else(|| BusinessError::campaign_not_found(parsed.campaign_id.as_str()))?;

        let member = self
            .members
            .upsert(&parsed.person.id, parsed.person.member_type)
            .await?;

        let check_in = parse_check_in(parsed.check_in_at.as_deref(), &self.business_tz);
        let mut status = normalize_status(&parsed.status, check_in.as_ref());
        let check_in_at = check_in.as_ref().map(Timestamp::from_zoned);
        if check_in_at.is_some() {
            status = RegistrationStatus::Attended;
        }

        let source_payload = serde_json::to_value(&parsed).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, "Failed to snapshot attendee payload")
                .with_detail("cause", e.to_string())
        })?;

        let registration = self
            .registrations
            .upsert(RegistrationUpsert {
                event_id: event.id,
                member_id: member.id,
                status,
                check_in_at,
                booking: parsed.booking_refs(),
                source_payload,
            })
            .await?;

        tracing::debug!(
            campaign_id = %parsed.campaign_id,
            member_id = %parsed.person.id,
            raw_status = %parsed.status,
            status = %registration.status,
            "Attendee upsert applied"
        );

        Ok(RegistrationWithEvent {
            registration,
            event,
        })
    }
}
