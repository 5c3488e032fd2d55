//! HTTP handlers for the CRM webhook endpoints.
//!
//! Handlers only translate HTTP into a `ProcessDeliveryCommand` and the
//! outcome back into a response. Processing runs on its own task: once the
//! ledger row exists the delivery is driven to a terminal state even if the
//! caller disconnects.

use std::sync::Arc;

use axum::extract::{Extension, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono_tz::Tz;
use serde_json::Value;

use super::dto::DeliveryResponse;
use super::errors::WebhookApiError;
use crate::adapters::http::middleware::{header_str, RawBody, IDEMPOTENCY_KEY_HEADER};
use crate::application::handlers::ingest::{
    ApplyAttendeeUpsertHandler, ApplyCampaignUpsertHandler, DeliveryOutcome, IdempotencyLedger,
    ProcessDeliveryCommand, ProcessDeliveryHandler,
};
use crate::domain::delivery::DeliverySource;
use crate::domain::webhook::WebhookVerifier;
use crate::ports::{
    DeliveryRepository, EventRepository, HtmlSanitizer, MemberRepository, RegistrationRepository,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Storage and content adapters the webhook pipeline runs on.
#[derive(Clone)]
pub struct IngestPorts {
    pub deliveries: Arc<dyn DeliveryRepository>,
    pub events: Arc<dyn EventRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub registrations: Arc<dyn RegistrationRepository>,
    pub sanitizer: Arc<dyn HtmlSanitizer>,
}

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct WebhookAppState {
    pub processor: Arc<ProcessDeliveryHandler>,
    pub verifier: Arc<WebhookVerifier>,
}

impl WebhookAppState {
    pub fn new(ports: IngestPorts, verifier: WebhookVerifier, business_tz: Tz) -> Self {
        let ledger = IdempotencyLedger::new(ports.deliveries);
        let campaigns =
            ApplyCampaignUpsertHandler::new(ports.events.clone(), ports.sanitizer, business_tz);
        let attendees = ApplyAttendeeUpsertHandler::new(
            ports.events,
            ports.members,
            ports.registrations,
            business_tz,
        );

        Self {
            processor: Arc::new(ProcessDeliveryHandler::new(ledger, campaigns, attendees)),
            verifier: Arc::new(verifier),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhooks/crm/campaign
pub async fn campaign_upsert(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    Extension(raw): Extension<RawBody>,
) -> Result<Response, WebhookApiError> {
    run_delivery(state, DeliverySource::CampaignUpsert, &headers, raw).await
}

/// POST /webhooks/crm/attendee
pub async fn attendee_upsert(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    Extension(raw): Extension<RawBody>,
) -> Result<Response, WebhookApiError> {
    run_delivery(state, DeliverySource::AttendeeUpsert, &headers, raw).await
}

async fn run_delivery(
    state: WebhookAppState,
    source: DeliverySource,
    headers: &HeaderMap,
    raw: RawBody,
) -> Result<Response, WebhookApiError> {
    let payload: Value =
        serde_json::from_slice(&raw.0).map_err(|_| WebhookApiError::InvalidJson)?;

    let cmd = ProcessDeliveryCommand {
        source,
        idempotency_key: header_str(headers, IDEMPOTENCY_KEY_HEADER).map(str::to_string),
        payload,
    };

    let processor = state.processor.clone();
    let outcome = tokio::spawn(async move { processor.handle(cmd).await }).await??;

    let response = match outcome {
        DeliveryOutcome::Processed { .. } => {
            (StatusCode::ACCEPTED, Json(DeliveryResponse::processed())).into_response()
        }
        DeliveryOutcome::Duplicate {
            delivery_id,
            status,
        } => {
            tracing::info!(
                delivery_id = %delivery_id,
                source = %source,
                recorded_status = status.as_str(),
                "Duplicate delivery acknowledged"
            );
            (StatusCode::OK, Json(DeliveryResponse::duplicate())).into_response()
        }
    };
    Ok(response)
}
