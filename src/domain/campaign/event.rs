//! Event projection of a CRM campaign.
//!
//! The CRM campaign id is the merge key; `EventId` is internal and never
//! exposed to the CRM. Upserts are full replacements: every mutable field is
//! overwritten, so a value omitted by a later delivery reverts to its default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{CampaignId, EventId, Timestamp, ValidationError};

/// Campaign lifecycle as reported by the CRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventStatus {
    Planned,
    Confirmed,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub const ALL: [EventStatus; 4] = [
        EventStatus::Planned,
        EventStatus::Confirmed,
        EventStatus::Completed,
        EventStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Planned => "Planned",
            EventStatus::Confirmed => "Confirmed",
            EventStatus::Completed => "Completed",
            EventStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "campaign.status",
                    format!("unknown campaign status '{}'", s),
                )
            })
    }
}

/// Latitude/longitude pair, range-checked at payload validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub geo: Option<GeoPoint>,
}

/// Full replacement values for the event keyed by `campaign_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventUpsert {
    pub campaign_id: CampaignId,
    pub title: String,
    pub subtitle: Option<String>,
    /// Already sanitized HTML.
    pub description: Option<String>,
    pub status: EventStatus,
    pub is_public: bool,
    pub is_online: bool,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub venue: Venue,
    pub booking_event_id: Option<String>,
    pub registration_url: Option<String>,
    pub header_image_url: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: EventId,
    pub campaign_id: CampaignId,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub status: EventStatus,
    pub is_public: bool,
    pub is_online: bool,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub venue: Venue,
    pub booking_event_id: Option<String>,
    pub registration_url: Option<String>,
    pub header_image_url: Option<String>,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    pub fn from_upsert(upsert: EventUpsert, now: Timestamp) -> Self {
        Self {
            id: EventId::new(),
            campaign_id: upsert.campaign_id,
            title: upsert.title,
            subtitle: upsert.subtitle,
            description: upsert.description,
            status: upsert.status,
            is_public: upsert.is_public,
            is_online: upsert.is_online,
            starts_at: upsert.starts_at,
            ends_at: upsert.ends_at,
            venue: upsert.venue,
            booking_event_id: upsert.booking_event_id,
            registration_url: upsert.registration_url,
            header_image_url: upsert.header_image_url,
            tags: upsert.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every mutable field with the upsert's values.
    pub fn apply(&mut self, upsert: EventUpsert, now: Timestamp) {
        let EventUpsert {
            campaign_id: _,
            title,
            subtitle,
            description,
            status,
            is_public,
            is_online,
            starts_at,
            ends_at,
            venue,
            booking_event_id,
            registration_url,
            header_image_url,
            tags,
        } = upsert;

        self.title = title;
        self.subtitle = subtitle;
        self.description = description;
        self.status = status;
        self.is_public = is_public;
        self.is_online = is_online;
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        self.venue = venue;
        self.booking_event_id = booking_event_id;
        self.registration_url = registration_url;
        self.header_image_url = header_image_url;
        self.tags = tags;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upsert(tags: Vec<&str>) -> EventUpsert {
        let start = Timestamp::now();
        EventUpsert {
            campaign_id: CampaignId::new("C1").unwrap(),
            title: "Spring Meetup".to_string(),
            subtitle: Some("Talks".to_string()),
            description: None,
            status: EventStatus::Planned,
            is_public: true,
            is_online: false,
            starts_at: start,
            ends_at: start,
            venue: Venue {
                city: Some("Berlin".to_string()),
                geo: Some(GeoPoint { lat: 52.5, lon: 13.4 }),
                ..Default::default()
            },
            booking_event_id: None,
            registration_url: None,
            header_image_url: None,
            tags: tags.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn status_parses_exact_names() {
        assert_eq!("Confirmed".parse::<EventStatus>().unwrap(), EventStatus::Confirmed);
        assert!("confirmed".parse::<EventStatus>().is_err());
    }

    #[test]
    fn apply_is_full_replace() {
        let mut event = Event::from_upsert(upsert(vec!["a", "b"]), Timestamp::now());
        let id = event.id;
        let created = event.created_at;

        let mut next = upsert(vec![]);
        next.subtitle = None;
        next.venue = Venue::default();
        next.status = EventStatus::Cancelled;
        event.apply(next, Timestamp::now());

        assert_eq!(event.id, id);
        assert_eq!(event.created_at, created);
        assert!(event.tags.is_empty());
        assert!(event.subtitle.is_none());
        assert!(event.venue.geo.is_none());
        assert_eq!(event.status, EventStatus::Cancelled);
    }
}
