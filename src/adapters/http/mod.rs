//! HTTP adapter - axum surface of the ingestion service.
//!
//! - `webhooks` - the two CRM delivery endpoints
//! - `middleware` - raw body capture and webhook authentication

pub mod middleware;
pub mod webhooks;

mod router;

pub use router::{app_router, healthz};
pub use webhooks::{IngestPorts, WebhookAppState};
