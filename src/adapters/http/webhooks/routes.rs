//! Axum router for the CRM webhook endpoints.

use axum::{middleware, routing::post, Router};

use super::handlers::{attendee_upsert, campaign_upsert, WebhookAppState};
use crate::adapters::http::middleware::{capture_raw_body, webhook_auth, BodyLimit};

/// Create the webhook router, to be nested under `/webhooks`.
///
/// # Routes
/// - `POST /crm/campaign` - campaign upsert deliveries
/// - `POST /crm/attendee` - attendee upsert deliveries
///
/// The raw body is captured before verification; both layers only run for
/// matched routes.
pub fn webhook_routes(state: WebhookAppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/crm/campaign", post(campaign_upsert))
        .route("/crm/attendee", post(attendee_upsert))
        .route_layer(middleware::from_fn_with_state(
            state.verifier.clone(),
            webhook_auth,
        ))
        .route_layer(middleware::from_fn_with_state(
            BodyLimit(max_body_bytes),
            capture_raw_body,
        ))
        .with_state(state)
}
