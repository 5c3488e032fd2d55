//! `attendee.upsert` delivery body.

use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;

use super::reader::{Fields, Issues};
use super::{PayloadIssue, PayloadValidationError};
use crate::domain::foundation::{CampaignId, MemberId, Timestamp};
use crate::domain::registration::{BookingRefs, MemberType};

pub const ATTENDEE_EVENT_TYPE: &str = "attendee.upsert";

/// A validated attendee delivery.
///
/// Serializes back to the wire shape with unknown fields dropped; that form
/// is what gets snapshotted onto the registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendeeUpsertPayload {
    pub event_type: String,
    pub version: i64,
    pub campaign_id: CampaignId,
    pub person: PersonRef,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doo: Option<BookingRefs>,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonRef {
    #[serde(rename = "type")]
    pub member_type: MemberType,
    pub id: MemberId,
}

impl AttendeeUpsertPayload {
    /// `business_tz` places an `updated_at` that carries no offset.
    pub fn parse(value: &Value, business_tz: &Tz) -> Result<Self, PayloadValidationError> {
        let mut issues = Issues::new();
        let root = Fields::root(value, &mut issues);

        let event_type = root.literal("event_type", ATTENDEE_EVENT_TYPE, &mut issues);
        let version = root.int_at_least("version", 1, &mut issues);
        let campaign_id = root
            .required_non_blank("campaign_id", &mut issues)
            .and_then(|id| CampaignId::new(id).ok());
        let person = root
            .required_object("person", &mut issues)
            .and_then(|p| parse_person(&p, &mut issues));
        let status = root.required_string("status", &mut issues);
        // Validity of the check-in is decided by the normalizer, not here.
        let check_in_at = root.optional_string("check_in_at", &mut issues);
        let doo = parse_booking(&root, &mut issues);
        let updated_at = root.required_string("updated_at", &mut issues);

        if let Some(raw) = &updated_at {
            if Timestamp::parse_iso(raw, business_tz).is_none() {
                issues.push(PayloadIssue::new("updated_at", "Invalid updated_at date"));
            }
        }

        if !issues.is_empty() {
            return Err(PayloadValidationError { issues });
        }

        match (event_type, version, campaign_id, person, status, doo, updated_at) {
            (
                Some(event_type),
                Some(version),
                Some(campaign_id),
                Some(person),
                Some(status),
                Some(doo),
                Some(updated_at),
            ) => Ok(Self {
                event_type,
                version,
                campaign_id,
                person,
                status,
                check_in_at,
                doo,
                updated_at,
            }),
            _ => Err(PayloadValidationError { issues }),
        }
    }

    pub fn booking_refs(&self) -> BookingRefs {
        self.doo.clone().unwrap_or_default()
    }
}

fn parse_person(p: &Fields<'_>, issues: &mut Issues) -> Option<PersonRef> {
    let member_type = p
        .one_of("type", &["contact", "lead"], issues)
        .and_then(|t| t.parse::<MemberType>().ok());
    let id = p
        .required_non_blank("id", issues)
        .and_then(|id| MemberId::new(id).ok());

    Some(PersonRef {
        member_type: member_type?,
        id: id?,
    })
}

/// Outer `None` means the block was invalid; inner `None` means absent.
fn parse_booking(root: &Fields<'_>, issues: &mut Issues) -> Option<Option<BookingRefs>> {
    let before = issues.len();
    let Some(d) = root.optional_object("doo", issues) else {
        return (issues.len() == before).then_some(None);
    };

    let refs = BookingRefs {
        event_id: d.optional_string("event_id", issues),
        booking_id: d.optional_string("booking_id", issues),
        attendee_id: d.optional_string("attendee_id", issues),
    };
    (issues.len() == before).then_some(Some(refs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Berlin;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "event_type": "attendee.upsert",
            "version": 1,
            "campaign_id": "C1",
            "person": {"type": "contact", "id": "003A"},
            "status": "active",
            "updated_at": "2026-01-01T09:00:00Z",
            "unexpected": "dropped"
        })
    }

    #[test]
    fn valid_payload_parses() {
        let payload = AttendeeUpsertPayload::parse(&valid(), &Berlin).unwrap();
        assert_eq!(payload.campaign_id.as_str(), "C1");
        assert_eq!(payload.person.member_type, MemberType::Contact);
        assert_eq!(payload.booking_refs(), BookingRefs::default());
    }

    #[test]
    fn snapshot_drops_unknown_fields() {
        let payload = AttendeeUpsertPayload::parse(&valid(), &Berlin).unwrap();
        let snapshot = serde_json::to_value(&payload).unwrap();

        assert_eq!(snapshot["person"], json!({"type": "contact", "id": "003A"}));
        assert!(snapshot.get("unexpected").is_none());
        assert!(snapshot.get("check_in_at").is_none());
    }

    #[test]
    fn unparseable_check_in_is_not_a_validation_error() {
        let mut value = valid();
        value["check_in_at"] = json!("yesterday-ish");
        let payload = AttendeeUpsertPayload::parse(&value, &Berlin).unwrap();
        assert_eq!(payload.check_in_at.as_deref(), Some("yesterday-ish"));
    }

    #[test]
    fn updated_at_without_offset_is_accepted() {
        let mut value = valid();
        value["updated_at"] = json!("2026-01-01T09:00:00");
        assert!(AttendeeUpsertPayload::parse(&value, &Berlin).is_ok());

        value["updated_at"] = json!("2026-01-01");
        assert!(AttendeeUpsertPayload::parse(&value, &Berlin).is_ok());
    }

    #[test]
    fn booking_block_is_read() {
        let mut value = valid();
        value["doo"] = json!({"event_id": "E1", "booking_id": "B1", "attendee_id": null});
        let payload = AttendeeUpsertPayload::parse(&value, &Berlin).unwrap();

        let refs = payload.booking_refs();
        assert_eq!(refs.event_id.as_deref(), Some("E1"));
        assert_eq!(refs.booking_id.as_deref(), Some("B1"));
        assert!(refs.attendee_id.is_none());
    }

    #[test]
    fn invalid_fields_are_collected() {
        let value = json!({
            "event_type": "attendee.upsert",
            "version": 1,
            "campaign_id": "C1",
            "person": {"type": "partner", "id": ""},
            "status": 5,
            "updated_at": "soon"
        });

        let err = AttendeeUpsertPayload::parse(&value, &Berlin).unwrap_err();
        let paths: Vec<_> = err.issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["person.type", "person.id", "status", "updated_at"]
        );
    }
}
