//! PostgreSQL implementation of EventRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::campaign::{Event, EventStatus, EventUpsert, GeoPoint, Venue};
use crate::domain::foundation::{CampaignId, DomainError, EventId, Timestamp};
use crate::ports::EventRepository;

pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an event.
#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    campaign_id: String,
    title: String,
    subtitle: Option<String>,
    description: Option<String>,
    status: String,
    is_public: bool,
    is_online: bool,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    venue_name: Option<String>,
    street: Option<String>,
    postal_code: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    booking_event_id: Option<String>,
    registration_url: Option<String>,
    header_image_url: Option<String>,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = DomainError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let status: EventStatus = row
            .status
            .parse()
            .map_err(|e| DomainError::database(format!("Invalid status value: {}", e)))?;
        let campaign_id = CampaignId::new(row.campaign_id)
            .map_err(|e| DomainError::database(format!("Invalid campaign_id: {}", e)))?;

        Ok(Event {
            id: EventId::from_uuid(row.id),
            campaign_id,
            title: row.title,
            subtitle: row.subtitle,
            description: row.description,
            status,
            is_public: row.is_public,
            is_online: row.is_online,
            starts_at: Timestamp::from_datetime(row.starts_at),
            ends_at: Timestamp::from_datetime(row.ends_at),
            venue: Venue {
                name: row.venue_name,
                street: row.street,
                postal_code: row.postal_code,
                city: row.city,
                state: row.state,
                country: row.country,
                geo: row.lat.zip(row.lon).map(|(lat, lon)| GeoPoint { lat, lon }),
            },
            booking_event_id: row.booking_event_id,
            registration_url: row.registration_url,
            header_image_url: row.header_image_url,
            tags: row.tags,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const EVENT_COLUMNS: &str = r#"
    id, campaign_id, title, subtitle, description, status, is_public, is_online,
    starts_at, ends_at, venue_name, street, postal_code, city, state, country, lat, lon,
    booking_event_id, registration_url, header_image_url, tags, created_at, updated_at
"#;

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn upsert(&self, upsert: EventUpsert) -> Result<Event, DomainError> {
        let now = Timestamp::now();
        let geo = upsert.venue.geo;
        let sql = format!(
            r#"
            INSERT INTO events (
                id, campaign_id, title, subtitle, description, status, is_public, is_online,
                starts_at, ends_at, venue_name, street, postal_code, city, state, country,
                lat, lon, booking_event_id, registration_url, header_image_url, tags,
                created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18, $19, $20, $21, $22, $23, $23
            )
            ON CONFLICT (campaign_id) DO UPDATE SET
                title = EXCLUDED.title,
                subtitle = EXCLUDED.subtitle,
                description = EXCLUDED.description,
                status = EXCLUDED.status,
                is_public = EXCLUDED.is_public,
                is_online = EXCLUDED.is_online,
                starts_at = EXCLUDED.starts_at,
                ends_at = EXCLUDED.ends_at,
                venue_name = EXCLUDED.venue_name,
                street = EXCLUDED.street,
                postal_code = EXCLUDED.postal_code,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                country = EXCLUDED.country,
                lat = EXCLUDED.lat,
                lon = EXCLUDED.lon,
                booking_event_id = EXCLUDED.booking_event_id,
                registration_url = EXCLUDED.registration_url,
                header_image_url = EXCLUDED.header_image_url,
                tags = EXCLUDED.tags,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );

        let row: EventRow = sqlx::query_as(&sql)
            .bind(EventId::new().as_uuid())
            .bind(upsert.campaign_id.as_str())
            .bind(&upsert.title)
            .bind(&upsert.subtitle)
            .bind(&upsert.description)
            .bind(upsert.status.as_str())
            .bind(upsert.is_public)
            .bind(upsert.is_online)
            .bind(upsert.starts_at.as_datetime())
            .bind(upsert.ends_at.as_datetime())
            .bind(&upsert.venue.name)
            .bind(&upsert.venue.street)
            .bind(&upsert.venue.postal_code)
            .bind(&upsert.venue.city)
            .bind(&upsert.venue.state)
            .bind(&upsert.venue.country)
            .bind(geo.map(|g| g.lat))
            .bind(geo.map(|g| g.lon))
            .bind(&upsert.booking_event_id)
            .bind(&upsert.registration_url)
            .bind(&upsert.header_image_url)
            .bind(&upsert.tags)
            .bind(now.as_datetime())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to upsert event: {}", e))
                    .with_detail("campaign_id", upsert.campaign_id.as_str())
            })?;

        row.try_into()
    }

    async fn find_by_campaign_id(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Option<Event>, DomainError> {
        let sql = format!("SELECT {} FROM events WHERE campaign_id = $1", EVENT_COLUMNS);
        let row: Option<EventRow> = sqlx::query_as(&sql)
            .bind(campaign_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch event: {}", e)))?;

        row.map(Event::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(lat: Option<f64>, lon: Option<f64>, status: &str) -> EventRow {
        EventRow {
            id: Uuid::new_v4(),
            campaign_id: "C1".to_string(),
            title: "Spring Meetup".to_string(),
            subtitle: None,
            description: None,
            status: status.to_string(),
            is_public: false,
            is_online: true,
            starts_at: Utc::now(),
            ends_at: Utc::now(),
            venue_name: None,
            street: None,
            postal_code: None,
            city: Some("Berlin".to_string()),
            state: None,
            country: None,
            lat,
            lon,
            booking_event_id: None,
            registration_url: None,
            header_image_url: None,
            tags: vec!["x".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn geo_requires_both_coordinates() {
        let event = Event::try_from(row(Some(52.5), None, "Planned")).unwrap();
        assert!(event.venue.geo.is_none());

        let event = Event::try_from(row(Some(52.5), Some(13.4), "Planned")).unwrap();
        assert_eq!(event.venue.geo, Some(GeoPoint { lat: 52.5, lon: 13.4 }));
        assert_eq!(event.venue.city.as_deref(), Some("Berlin"));
    }

    #[test]
    fn unknown_status_is_database_error() {
        assert!(Event::try_from(row(None, None, "Draft")).is_err());
    }
}
