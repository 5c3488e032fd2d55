//! ProcessDeliveryHandler - drives one verified delivery through the ledger
//! and the matching upsert.
//!
//! ```text
//! verified → recorded → processed
//!                     → duplicate (no processing, no marking)
//!                     → failed    (ledger marked before the error surfaces)
//! ```

use serde_json::Value;
use thiserror::Error;

use super::{ApplyAttendeeUpsertHandler, ApplyCampaignUpsertHandler, IdempotencyLedger};
use crate::domain::delivery::{DeliverySource, DeliveryStatus};
use crate::domain::foundation::{DeliveryId, DomainError};
use crate::domain::sync::SyncError;

/// A delivery that has passed authentication.
#[derive(Debug, Clone)]
pub struct ProcessDeliveryCommand {
    pub source: DeliverySource,
    /// Raw `Idempotency-Key` header value, if sent.
    pub idempotency_key: Option<String>,
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    /// First sighting of the key; the upsert was applied.
    Processed { delivery_id: DeliveryId },
    /// The key was already recorded; nothing was applied.
    Duplicate {
        delivery_id: DeliveryId,
        status: DeliveryStatus,
    },
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Idempotency-Key header missing")]
    MissingIdempotencyKey,

    /// Processing failed and the ledger row was marked failed.
    #[error("delivery rejected: {0}")]
    Rejected(SyncError),

    /// Recording or completing the ledger row failed. A row that could not
    /// be marked processed has been marked failed where the store allowed it.
    #[error("ledger failure: {0}")]
    Ledger(DomainError),

    /// Processing failed and so did marking the ledger row.
    #[error("could not mark delivery failed ({cause}) after: {original}")]
    MarkFailed { original: SyncError, cause: DomainError },
}

pub struct ProcessDeliveryHandler {
    ledger: IdempotencyLedger,
    campaigns: ApplyCampaignUpsertHandler,
    attendees: ApplyAttendeeUpsertHandler,
}

impl ProcessDeliveryHandler {
    pub fn new(
        ledger: IdempotencyLedger,
        campaigns: ApplyCampaignUpsertHandler,
        attendees: ApplyAttendeeUpsertHandler,
    ) -> Self {
        Self {
            ledger,
            campaigns,
            attendees,
        }
    }

    pub async fn handle(
        &self,
        cmd: ProcessDeliveryCommand,
    ) -> Result<DeliveryOutcome, DeliveryError> {
        // 1. Require a usable idempotency key
        let key = cmd
            .idempotency_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(DeliveryError::MissingIdempotencyKey)?
            .to_string();

        // 2. Insert-first; only the inserting attempt proceeds
        let recorded = self
            .ledger
            .record_delivery(cmd.source, &key, cmd.payload.clone())
            .await
            .map_err(DeliveryError::Ledger)?;

        let delivery_id = recorded.record.id;
        if !recorded.should_process {
            return Ok(DeliveryOutcome::Duplicate {
                delivery_id,
                status: recorded.record.status,
            });
        }

        // 3. Apply
        let applied = match cmd.source {
            DeliverySource::CampaignUpsert => {
                self.campaigns.handle(&cmd.payload).await.map(|_| ())
            }
            DeliverySource::AttendeeUpsert => {
                self.attendees.handle(&cmd.payload).await.map(|_| ())
            }
        };

        // 4. Record the terminal state
        match applied {
            Ok(()) => {
                if let Err(cause) = self.ledger.mark_processed(&delivery_id).await {
                    tracing::error!(
                        delivery_id = %delivery_id,
                        idempotency_key = %key,
                        error = %cause,
                        "Failed to mark delivery processed"
                    );
                    let detail = format!("mark processed failed: {}", cause);
                    if let Err(second) = self.ledger.mark_failed(&delivery_id, &detail).await {
                        tracing::error!(
                            delivery_id = %delivery_id,
                            error = %second,
                            "Failed to mark delivery failed"
                        );
                    }
                    return Err(DeliveryError::Ledger(cause));
                }
                tracing::info!(
                    delivery_id = %delivery_id,
                    source = %cmd.source,
                    idempotency_key = %key,
                    "Delivery processed"
                );
                Ok(DeliveryOutcome::Processed { delivery_id })
            }
            Err(original) => {
                tracing::error!(
                    delivery_id = %delivery_id,
                    source = %cmd.source,
                    idempotency_key = %key,
                    kind = ?original.kind(),
                    error = %original,
                    "Delivery processing failed"
                );
                if let Err(cause) = self
                    .ledger
                    .mark_failed(&delivery_id, &original.ledger_detail())
                    .await
                {
                    tracing::error!(
                        delivery_id = %delivery_id,
                        error = %cause,
                        "Failed to mark delivery failed"
                    );
                    return Err(DeliveryError::MarkFailed { original, cause });
                }
                Err(DeliveryError::Rejected(original))
            }
        }
    }
}
