//! In-memory idempotency ledger for tests and embedding.
//!
//! The key check and the insert happen under one write lock, which gives the
//! same all-or-nothing guarantee as the database unique constraint.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::delivery::{DeliveryRecord, DeliveryStatus};
use crate::domain::foundation::{DeliveryId, DomainError, ErrorCode, Timestamp};
use crate::ports::{DeliveryRepository, InsertOutcome};

#[derive(Debug, Default, Clone)]
pub struct InMemoryDeliveryRepository {
    /// Rows keyed by idempotency key.
    rows: Arc<RwLock<HashMap<String, DeliveryRecord>>>,
}

impl InMemoryDeliveryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored row.
    pub async fn all(&self) -> Vec<DeliveryRecord> {
        self.rows.read().await.values().cloned().collect()
    }

    fn not_found(id: &DeliveryId) -> DomainError {
        DomainError::new(ErrorCode::DeliveryNotFound, format!("Delivery {} not found", id))
    }
}

#[async_trait]
impl DeliveryRepository for InMemoryDeliveryRepository {
    async fn insert_if_absent(
        &self,
        record: &DeliveryRecord,
    ) -> Result<InsertOutcome, DomainError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&record.idempotency_key) {
            return Ok(InsertOutcome::DuplicateKey);
        }
        rows.insert(record.idempotency_key.clone(), record.clone());
        Ok(InsertOutcome::Inserted(record.clone()))
    }

    async fn find_by_key(
        &self,
        idempotency_key: &str,
    ) -> Result<Option<DeliveryRecord>, DomainError> {
        Ok(self.rows.read().await.get(idempotency_key).cloned())
    }

    async fn mark_processed(&self, id: &DeliveryId, at: Timestamp) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .values_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        if row.status == DeliveryStatus::Accepted {
            row.mark_processed(at)?;
        }
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: &DeliveryId,
        error: &str,
        at: Timestamp,
    ) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .values_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        if row.status == DeliveryStatus::Accepted {
            row.mark_failed(error, at)?;
        }
        Ok(())
    }
}
