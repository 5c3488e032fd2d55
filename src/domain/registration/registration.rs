//! Registration of a member for an event.

use serde::{Deserialize, Serialize};

use super::RegistrationStatus;
use crate::domain::campaign::Event;
use crate::domain::foundation::{EventId, MemberId, RegistrationId, Timestamp};

/// Identifiers assigned by the external booking system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRefs {
    pub event_id: Option<String>,
    pub booking_id: Option<String>,
    pub attendee_id: Option<String>,
}

/// Full replacement values for the registration identified by
/// `(event_id, member_id)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationUpsert {
    pub event_id: EventId,
    pub member_id: MemberId,
    pub status: RegistrationStatus,
    pub check_in_at: Option<Timestamp>,
    pub booking: BookingRefs,
    /// Parsed attendee payload, kept for traceability.
    pub source_payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub member_id: MemberId,
    pub status: RegistrationStatus,
    pub check_in_at: Option<Timestamp>,
    pub booking: BookingRefs,
    pub source_payload: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Registration {
    pub fn from_upsert(upsert: RegistrationUpsert, now: Timestamp) -> Self {
        Self {
            id: RegistrationId::new(),
            event_id: upsert.event_id,
            member_id: upsert.member_id,
            status: upsert.status,
            check_in_at: upsert.check_in_at,
            booking: upsert.booking,
            source_payload: upsert.source_payload,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites every mutable field; identity and creation time are kept.
    pub fn apply(&mut self, upsert: RegistrationUpsert, now: Timestamp) {
        self.status = upsert.status;
        self.check_in_at = upsert.check_in_at;
        self.booking = upsert.booking;
        self.source_payload = upsert.source_payload;
        self.updated_at = now;
    }
}

/// A registration joined with the event it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationWithEvent {
    pub registration: Registration,
    pub event: Event,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn upsert(status: RegistrationStatus, booking_id: Option<&str>) -> RegistrationUpsert {
        RegistrationUpsert {
            event_id: EventId::new(),
            member_id: MemberId::new("003A").unwrap(),
            status,
            check_in_at: None,
            booking: BookingRefs {
                booking_id: booking_id.map(String::from),
                ..Default::default()
            },
            source_payload: json!({"status": status.as_str()}),
        }
    }

    #[test]
    fn apply_replaces_booking_refs_entirely() {
        let first = upsert(RegistrationStatus::Pending, Some("B-1"));
        let mut registration = Registration::from_upsert(first.clone(), Timestamp::now());
        let id = registration.id;

        let second = RegistrationUpsert {
            event_id: first.event_id,
            ..upsert(RegistrationStatus::Registered, None)
        };
        registration.apply(second, Timestamp::now());

        assert_eq!(registration.id, id);
        assert_eq!(registration.status, RegistrationStatus::Registered);
        assert!(registration.booking.booking_id.is_none());
        assert_eq!(registration.source_payload, json!({"status": "registered"}));
    }
}
