//! PostgreSQL implementation of DeliveryRepository.
//!
//! Dedup relies on the `webhook_deliveries_idempotency_key_key` unique
//! constraint through `ON CONFLICT DO NOTHING`; no lookup precedes the insert.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::delivery::{DeliveryRecord, DeliverySource, DeliveryStatus};
use crate::domain::foundation::{DeliveryId, DomainError, ErrorCode, Timestamp};
use crate::ports::{DeliveryRepository, InsertOutcome};

pub struct PostgresDeliveryRepository {
    pool: PgPool,
}

impl PostgresDeliveryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Distinguishes "no such row" from "row already terminal" after an
    /// update that matched nothing.
    async fn ensure_exists(&self, id: &DeliveryId) -> Result<(), DomainError> {
        let exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM webhook_deliveries WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::database(format!("Failed to look up delivery: {}", e))
                })?;

        match exists {
            Some(_) => Ok(()),
            None => Err(DomainError::new(
                ErrorCode::DeliveryNotFound,
                format!("Delivery {} not found", id),
            )),
        }
    }
}

/// Database row representation of a ledger entry.
#[derive(Debug, sqlx::FromRow)]
struct DeliveryRow {
    id: Uuid,
    idempotency_key: String,
    source: String,
    payload: serde_json::Value,
    status: String,
    error: Option<String>,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
}

impl TryFrom<DeliveryRow> for DeliveryRecord {
    type Error = DomainError;

    fn try_from(row: DeliveryRow) -> Result<Self, Self::Error> {
        let source: DeliverySource = row.source.parse().map_err(|e| {
            DomainError::database(format!("Invalid source value: {}", e))
        })?;
        let status: DeliveryStatus = row.status.parse().map_err(|e| {
            DomainError::database(format!("Invalid status value: {}", e))
        })?;

        Ok(DeliveryRecord {
            id: DeliveryId::from_uuid(row.id),
            idempotency_key: row.idempotency_key,
            source,
            payload: row.payload,
            status,
            error: row.error,
            created_at: Timestamp::from_datetime(row.created_at),
            processed_at: row.processed_at.map(Timestamp::from_datetime),
        })
    }
}

const RETURNING: &str =
    "id, idempotency_key, source, payload, status, error, created_at, processed_at";

#[async_trait]
impl DeliveryRepository for PostgresDeliveryRepository {
    async fn insert_if_absent(
        &self,
        record: &DeliveryRecord,
    ) -> Result<InsertOutcome, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO webhook_deliveries (
                id, idempotency_key, source, payload, status, error, created_at, processed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (idempotency_key) DO NOTHING
            RETURNING {}
            "#,
            RETURNING
        );

        let row: Option<DeliveryRow> = sqlx::query_as(&sql)
            .bind(record.id.as_uuid())
            .bind(&record.idempotency_key)
            .bind(record.source.as_str())
            .bind(&record.payload)
            .bind(record.status.as_str())
            .bind(&record.error)
            .bind(record.created_at.as_datetime())
            .bind(record.processed_at.map(|t| *t.as_datetime()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to record delivery: {}", e)))?;

        match row {
            Some(row) => Ok(InsertOutcome::Inserted(row.try_into()?)),
            None => Ok(InsertOutcome::DuplicateKey),
        }
    }

    async fn find_by_key(
        &self,
        idempotency_key: &str,
    ) -> Result<Option<DeliveryRecord>, DomainError> {
        let sql = format!(
            "SELECT {} FROM webhook_deliveries WHERE idempotency_key = $1",
            RETURNING
        );
        let row: Option<DeliveryRow> = sqlx::query_as(&sql)
            .bind(idempotency_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch delivery: {}", e)))?;

        row.map(DeliveryRecord::try_from).transpose()
    }

    async fn mark_processed(&self, id: &DeliveryId, at: Timestamp) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE webhook_deliveries
            SET status = 'processed', processed_at = $2
            WHERE id = $1 AND status = 'accepted'
            "#,
        )
        .bind(id.as_uuid())
        .bind(at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to mark delivery processed: {}", e)))?;

        if result.rows_affected() == 0 {
            self.ensure_exists(id).await?;
        }
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: &DeliveryId,
        error: &str,
        at: Timestamp,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE webhook_deliveries
            SET status = 'failed', error = $2, processed_at = $3
            WHERE id = $1 AND status = 'accepted'
            "#,
        )
        .bind(id.as_uuid())
        .bind(error)
        .bind(at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to mark delivery failed: {}", e)))?;

        if result.rows_affected() == 0 {
            self.ensure_exists(id).await?;
        }
        Ok(())
    }
}
