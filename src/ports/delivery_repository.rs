//! DeliveryRepository port - durable idempotency ledger.
//!
//! The unique constraint on `idempotency_key` is the only thing standing
//! between two concurrent redeliveries of the same webhook. Implementations
//! must make `insert_if_absent` a single atomic operation at the storage
//! layer; a lookup followed by an insert is not acceptable.

use async_trait::async_trait;

use crate::domain::delivery::DeliveryRecord;
use crate::domain::foundation::{DeliveryId, DomainError, Timestamp};

/// Result of attempting to record a delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// First time this key was seen; the stored row is returned.
    Inserted(DeliveryRecord),
    /// A row with this key already exists.
    DuplicateKey,
}

#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    /// Inserts the record unless its idempotency key is already present.
    async fn insert_if_absent(&self, record: &DeliveryRecord) -> Result<InsertOutcome, DomainError>;

    async fn find_by_key(&self, idempotency_key: &str)
        -> Result<Option<DeliveryRecord>, DomainError>;

    /// Moves an `accepted` row to `processed`.
    ///
    /// A row already in a terminal state is left untouched.
    ///
    /// # Errors
    ///
    /// - `DeliveryNotFound` if no row has this id
    /// - `DatabaseError` on persistence failure
    async fn mark_processed(&self, id: &DeliveryId, at: Timestamp) -> Result<(), DomainError>;

    /// Moves an `accepted` row to `failed` with the given detail.
    ///
    /// A row already in a terminal state is left untouched.
    async fn mark_failed(
        &self,
        id: &DeliveryId,
        error: &str,
        at: Timestamp,
    ) -> Result<(), DomainError>;
}
