//! PostgreSQL implementation of RegistrationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, EventId, MemberId, RegistrationId, Timestamp,
};
use crate::domain::registration::{
    BookingRefs, Registration, RegistrationStatus, RegistrationUpsert,
};
use crate::ports::RegistrationRepository;

pub struct PostgresRegistrationRepository {
    pool: PgPool,
}

impl PostgresRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RegistrationRow {
    id: Uuid,
    event_id: Uuid,
    member_id: String,
    status: String,
    check_in_at: Option<DateTime<Utc>>,
    booking_event_id: Option<String>,
    booking_id: Option<String>,
    booking_attendee_id: Option<String>,
    source_payload: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = DomainError;

    fn try_from(row: RegistrationRow) -> Result<Self, Self::Error> {
        let status: RegistrationStatus = row
            .status
            .parse()
            .map_err(|e| DomainError::database(format!("Invalid status value: {}", e)))?;

        Ok(Registration {
            id: RegistrationId::from_uuid(row.id),
            event_id: EventId::from_uuid(row.event_id),
            member_id: MemberId::new(row.member_id)
                .map_err(|e| DomainError::database(format!("Invalid member id: {}", e)))?,
            status,
            check_in_at: row.check_in_at.map(Timestamp::from_datetime),
            booking: BookingRefs {
                event_id: row.booking_event_id,
                booking_id: row.booking_id,
                attendee_id: row.booking_attendee_id,
            },
            source_payload: row.source_payload,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const COLUMNS: &str = "id, event_id, member_id, status, check_in_at, booking_event_id, \
                       booking_id, booking_attendee_id, source_payload, created_at, updated_at";

#[async_trait]
impl RegistrationRepository for PostgresRegistrationRepository {
    async fn upsert(&self, upsert: RegistrationUpsert) -> Result<Registration, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO registrations (
                id, event_id, member_id, status, check_in_at, booking_event_id,
                booking_id, booking_attendee_id, source_payload, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            ON CONFLICT (event_id, member_id) DO UPDATE SET
                status = EXCLUDED.status,
                check_in_at = EXCLUDED.check_in_at,
                booking_event_id = EXCLUDED.booking_event_id,
                booking_id = EXCLUDED.booking_id,
                booking_attendee_id = EXCLUDED.booking_attendee_id,
                source_payload = EXCLUDED.source_payload,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            COLUMNS
        );

        let row: RegistrationRow = sqlx::query_as(&sql)
            .bind(RegistrationId::new().as_uuid())
            .bind(upsert.event_id.as_uuid())
            .bind(upsert.member_id.as_str())
            .bind(upsert.status.as_str())
            .bind(upsert.check_in_at.map(|t| *t.as_datetime()))
            .bind(&upsert.booking.event_id)
            .bind(&upsert.booking.booking_id)
            .bind(&upsert.booking.attendee_id)
            .bind(&upsert.source_payload)
            .bind(Timestamp::now().as_datetime())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to upsert registration: {}", e)))?;

        row.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_maps_booking_columns() {
        let row = RegistrationRow {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            member_id: "003A".to_string(),
            status: "attended".to_string(),
            check_in_at: Some(Utc::now()),
            booking_event_id: Some("E1".to_string()),
            booking_id: None,
            booking_attendee_id: Some("A1".to_string()),
            source_payload: json!({"status": "active"}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let registration = Registration::try_from(row).unwrap();
        assert_eq!(registration.status, RegistrationStatus::Attended);
        assert_eq!(registration.booking.event_id.as_deref(), Some("E1"));
        assert_eq!(registration.booking.attendee_id.as_deref(), Some("A1"));
    }
}
