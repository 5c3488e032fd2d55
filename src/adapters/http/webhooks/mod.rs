//! HTTP adapter for CRM webhook deliveries.
//!
//! - `POST /webhooks/crm/campaign` - campaign upsert
//! - `POST /webhooks/crm/attendee` - attendee upsert

mod dto;
mod errors;
mod handlers;
mod routes;

pub use dto::{DeliveryResponse, ErrorResponse, HealthResponse, InvalidPayloadResponse};
pub use errors::WebhookApiError;
pub use handlers::{attendee_upsert, campaign_upsert, IngestPorts, WebhookAppState};
pub use routes::webhook_routes;
