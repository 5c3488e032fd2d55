//! `campaign.upsert` delivery body.

use chrono::DateTime;
use chrono_tz::Tz;
use serde_json::Value;

use super::reader::{Fields, Issues};
use super::{PayloadIssue, PayloadValidationError};
use crate::domain::campaign::{EventStatus, EventUpsert, GeoPoint, Venue};
use crate::domain::foundation::{CampaignId, Timestamp};

pub const CAMPAIGN_EVENT_TYPE: &str = "campaign.upsert";

const STATUS_NAMES: [&str; 4] = ["Planned", "Confirmed", "Completed", "Cancelled"];

/// A validated campaign delivery.
#[derive(Debug, Clone)]
pub struct CampaignUpsertPayload {
    pub version: i64,
    pub campaign: CampaignPayload,
}

#[derive(Debug, Clone)]
pub struct CampaignPayload {
    pub id: CampaignId,
    pub name: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    /// Raw, unsanitized HTML.
    pub description: Option<String>,
    pub status: EventStatus,
    pub public: bool,
    /// Schedule in the business timezone.
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub is_online: bool,
    pub venue: Option<Venue>,
    pub doo_event_id: Option<String>,
    pub registration_url: Option<String>,
    pub header_image_url: Option<String>,
    pub tags: Vec<String>,
}

impl CampaignUpsertPayload {
    /// Validates the raw body, collecting every violation.
    pub fn parse(value: &Value, business_tz: &Tz) -> Result<Self, PayloadValidationError> {
        let mut issues = Issues::new();
        let root = Fields::root(value, &mut issues);

        let event_type = root.literal("event_type", CAMPAIGN_EVENT_TYPE, &mut issues);
        let version = root.int_at_least("version", 1, &mut issues);
        let campaign = root
            .required_object("campaign", &mut issues)
            .and_then(|c| parse_campaign(&c, business_tz, &mut issues));

        match (event_type, version, campaign) {
            (Some(_), Some(version), Some(campaign)) if issues.is_empty() => {
                Ok(Self { version, campaign })
            }
            _ => Err(PayloadValidationError { issues }),
        }
    }
}

fn parse_campaign(c: &Fields<'_>, tz: &Tz, issues: &mut Issues) -> Option<CampaignPayload> {
    let id = c
        .required_non_blank("id", issues)
        .and_then(|id| CampaignId::new(id).ok());
    let name = c.required_string("name", issues);
    let title = c.optional_string("title", issues);
    let subtitle = c.optional_string("subtitle", issues);
    let description = c.optional_string("description", issues);
    let status = c
        .one_of("status", &STATUS_NAMES, issues)
        .and_then(|s| s.parse::<EventStatus>().ok());
    let public = c.bool_or("public", false, issues);
    let start = schedule_point(c, "start", tz, issues);
    let end = schedule_point(c, "end", tz, issues);
    let is_online = c.required_bool("is_online", issues);
    let venue = parse_venue(c, issues);
    let doo_event_id = c.optional_string("doo_event_id", issues);
    let registration_url = c.optional_url("registration_url", issues);
    let header_image_url = c.optional_url("header_image_url", issues);
    let tags = c.string_list("tags", issues);

    if let (Some(start), Some(end)) = (&start, &end) {
        if start >= end {
            issues.push(PayloadIssue::new(
                c.path_of("end"),
                "End must be after start",
            ));
            return None;
        }
    }

    Some(CampaignPayload {
        id: id?,
        name: name?,
        title,
        subtitle,
        description,
        status: status?,
        public: public?,
        start: start?,
        end: end?,
        is_online: is_online?,
        venue: venue?,
        doo_event_id,
        registration_url,
        header_image_url,
        tags: tags?,
    })
}

/// Reads an ISO-8601 timestamp and moves it into the business timezone.
/// Values without an offset are taken as business-local.
fn schedule_point(c: &Fields<'_>, key: &str, tz: &Tz, issues: &mut Issues) -> Option<DateTime<Tz>> {
    let raw = c.required_string(key, issues)?;
    match Timestamp::parse_iso(&raw, tz) {
        Some(dt) => Some(dt.with_timezone(tz)),
        None => {
            issues.push(PayloadIssue::new(
                c.path_of(key),
                format!("Invalid {} date", key),
            ));
            None
        }
    }
}

/// Outer `None` means the venue block was invalid; inner `None` means absent.
fn parse_venue(c: &Fields<'_>, issues: &mut Issues) -> Option<Option<Venue>> {
    let before = issues.len();
    let Some(v) = c.optional_object("venue", issues) else {
        return (issues.len() == before).then_some(None);
    };

    let geo = match v.optional_object("geo", issues) {
        Some(g) => {
            let lat = g.number_in("lat", -90.0, 90.0, issues);
            let lon = g.number_in("lon", -180.0, 180.0, issues);
            lat.zip(lon).map(|(lat, lon)| GeoPoint { lat, lon })
        }
        None => None,
    };

    let venue = Venue {
        name: v.optional_string("name", issues),
        street: v.optional_string("street", issues),
        postal_code: v.optional_string("postal_code", issues),
        city: v.optional_string("city", issues),
        state: v.optional_string("state", issues),
        country: v.optional_string("country", issues),
        geo,
    };

    (issues.len() == before).then_some(Some(venue))
}

impl CampaignPayload {
    /// Title shown for the event: the explicit title unless blank, else the name.
    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => self.name.clone(),
        }
    }

    /// Builds the full-replace upsert; `description` is the sanitized HTML.
    pub fn into_event_upsert(self, description: Option<String>) -> EventUpsert {
        let title = self.display_title();
        EventUpsert {
            campaign_id: self.id,
            title,
            subtitle: self.subtitle,
            description,
            status: self.status,
            is_public: self.public,
            is_online: self.is_online,
            starts_at: Timestamp::from_zoned(&self.start),
            ends_at: Timestamp::from_zoned(&self.end),
            venue: self.venue.unwrap_or_default(),
            booking_event_id: self.doo_event_id,
            registration_url: self.registration_url,
            header_image_url: self.header_image_url,
            tags: self.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use serde_json::json;

    fn berlin() -> Tz {
        chrono_tz::Europe::Berlin
    }

    fn minimal() -> Value {
        json!({
            "event_type": "campaign.upsert",
            "version": 1,
            "campaign": {
                "id": "C1",
                "name": "N",
                "status": "Planned",
                "start": "2026-01-01T10:00:00+01:00",
                "end": "2026-01-01T12:00:00+01:00",
                "is_online": false,
                "tags": []
            }
        })
    }

    fn paths(err: &PayloadValidationError) -> Vec<&str> {
        err.issues.iter().map(|i| i.path.as_str()).collect()
    }

    #[test]
    fn minimal_payload_parses_with_defaults() {
        let payload = CampaignUpsertPayload::parse(&minimal(), &berlin()).unwrap();
        let campaign = payload.campaign;

        assert_eq!(campaign.id.as_str(), "C1");
        assert!(!campaign.public);
        assert!(campaign.venue.is_none());
        assert!(campaign.tags.is_empty());
        assert_eq!(campaign.start.hour(), 10);
    }

    #[test]
    fn schedule_is_moved_into_business_timezone() {
        let mut value = minimal();
        value["campaign"]["start"] = json!("2026-07-01T08:00:00Z");
        value["campaign"]["end"] = json!("2026-07-01T09:00:00Z");

        let payload = CampaignUpsertPayload::parse(&value, &berlin()).unwrap();
        assert_eq!(payload.campaign.start.hour(), 10);

        let upsert = payload.campaign.into_event_upsert(None);
        assert_eq!(upsert.starts_at.as_datetime().hour(), 8);
    }

    #[test]
    fn schedule_without_offset_is_business_local() {
        let mut value = minimal();
        value["campaign"]["start"] = json!("2026-01-01T10:00:00");
        value["campaign"]["end"] = json!("2026-01-02");

        let payload = CampaignUpsertPayload::parse(&value, &berlin()).unwrap();
        assert_eq!(payload.campaign.start.hour(), 10);
        assert_eq!(payload.campaign.end.hour(), 0);

        let upsert = payload.campaign.into_event_upsert(None);
        assert_eq!(upsert.starts_at.as_datetime().hour(), 9);
        assert_eq!(upsert.ends_at.as_datetime().hour(), 23);
    }

    #[test]
    fn blank_title_falls_back_to_name() {
        let mut value = minimal();
        value["campaign"]["title"] = json!("   ");
        let payload = CampaignUpsertPayload::parse(&value, &berlin()).unwrap();
        assert_eq!(payload.campaign.into_event_upsert(None).title, "N");

        value["campaign"]["title"] = json!("Spring Meetup");
        let payload = CampaignUpsertPayload::parse(&value, &berlin()).unwrap();
        assert_eq!(payload.campaign.display_title(), "Spring Meetup");
    }

    #[test]
    fn end_not_after_start_is_rejected() {
        let mut value = minimal();
        value["campaign"]["end"] = json!("2026-01-01T09:00:00Z");

        let err = CampaignUpsertPayload::parse(&value, &berlin()).unwrap_err();
        assert_eq!(paths(&err), vec!["campaign.end"]);
    }

    #[test]
    fn every_violation_is_collected() {
        let value = json!({
            "event_type": "campaign.delete",
            "version": 0,
            "campaign": {
                "id": "",
                "status": "Draft",
                "start": "tomorrow",
                "end": "2026-01-01T12:00:00+01:00",
                "is_online": "no",
                "registration_url": "not a url",
                "venue": {"geo": {"lat": 91, "lon": 0}}
            }
        });

        let err = CampaignUpsertPayload::parse(&value, &berlin()).unwrap_err();
        let found = paths(&err);
        for expected in [
            "event_type",
            "version",
            "campaign.id",
            "campaign.name",
            "campaign.status",
            "campaign.start",
            "campaign.is_online",
            "campaign.venue.geo.lat",
            "campaign.registration_url",
        ] {
            assert!(found.contains(&expected), "missing issue for {}", expected);
        }
    }

    #[test]
    fn missing_campaign_block_is_required() {
        let err = CampaignUpsertPayload::parse(
            &json!({"event_type": "campaign.upsert", "version": 1}),
            &berlin(),
        )
        .unwrap_err();
        assert_eq!(err.issues, vec![PayloadIssue::new("campaign", "Required")]);
    }

    #[test]
    fn full_payload_maps_onto_upsert() {
        let mut value = minimal();
        value["campaign"]["public"] = json!(true);
        value["campaign"]["subtitle"] = json!("Talks");
        value["campaign"]["doo_event_id"] = json!("D-7");
        value["campaign"]["header_image_url"] = json!("https://cdn.example.com/h.png");
        value["campaign"]["tags"] = json!(["a", "b"]);
        value["campaign"]["venue"] = json!({
            "name": "Hall", "city": "Berlin", "geo": {"lat": 52.52, "lon": 13.40}
        });

        let upsert = CampaignUpsertPayload::parse(&value, &berlin())
            .unwrap()
            .campaign
            .into_event_upsert(Some("<p>x</p>".to_string()));

        assert!(upsert.is_public);
        assert_eq!(upsert.booking_event_id.as_deref(), Some("D-7"));
        assert_eq!(upsert.venue.city.as_deref(), Some("Berlin"));
        assert_eq!(upsert.venue.geo, Some(GeoPoint { lat: 52.52, lon: 13.40 }));
        assert_eq!(upsert.tags, vec!["a", "b"]);
        assert_eq!(upsert.description.as_deref(), Some("<p>x</p>"));
    }
}
