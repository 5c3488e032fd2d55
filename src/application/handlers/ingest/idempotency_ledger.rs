//! IdempotencyLedger - records deliveries and decides whether to process them.

use std::sync::Arc;

use crate::domain::delivery::{DeliveryRecord, DeliverySource};
use crate::domain::foundation::{DeliveryId, DomainError, ErrorCode, Timestamp};
use crate::ports::{DeliveryRepository, InsertOutcome};

/// Outcome of recording a delivery attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDelivery {
    /// True only for the attempt whose insert created the row.
    pub should_process: bool,
    pub record: DeliveryRecord,
}

/// Insert-first ledger over a `DeliveryRepository`.
///
/// Concurrent attempts with the same key race on the storage unique
/// constraint; exactly one of them gets `should_process = true`.
pub struct IdempotencyLedger {
    repository: Arc<dyn DeliveryRepository>,
}

impl IdempotencyLedger {
    pub fn new(repository: Arc<dyn DeliveryRepository>) -> Self {
        Self { repository }
    }

    pub async fn record_delivery(
        &self,
        source: DeliverySource,
        idempotency_key: &str,
        payload: serde_json::Value,
    ) -> Result<RecordedDelivery, DomainError> {
        let candidate = DeliveryRecord::accept(source, idempotency_key, payload)
            .map_err(|e| DomainError::new(ErrorCode::ValidationFailed, e.to_string()))?;

        match self.repository.insert_if_absent(&candidate).await? {
            InsertOutcome::Inserted(record) => {
                tracing::debug!(
                    delivery_id = %record.id,
                    source = %source,
                    idempotency_key,
                    "Delivery recorded"
                );
                Ok(RecordedDelivery {
                    should_process: true,
                    record,
                })
            }
            InsertOutcome::DuplicateKey => {
                let record = self
                    .repository
                    .find_by_key(idempotency_key)
                    .await?
                    .ok_or_else(|| {
                        DomainError::new(
                            ErrorCode::DeliveryNotFound,
                            "Delivery reported as duplicate but not found on re-read",
                        )
                        .with_detail("idempotency_key", idempotency_key)
                    })?;
                tracing::info!(
                    delivery_id = %record.id,
                    source = %source,
                    idempotency_key,
                    status = record.status.as_str(),
                    "Duplicate delivery skipped"
                );
                Ok(RecordedDelivery {
                    should_process: false,
                    record,
                })
            }
        }
    }

    pub async fn mark_processed(&self, id: &DeliveryId) -> Result<(), DomainError> {
        self.repository.mark_processed(id, Timestamp::now()).await
    }

    pub async fn mark_failed(&self, id: &DeliveryId, error: &str) -> Result<(), DomainError> {
        self.repository
            .mark_failed(id, error, Timestamp::now())
            .await
    }
}
