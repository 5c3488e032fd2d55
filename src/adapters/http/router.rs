//! Application router: webhook routes plus the ambient HTTP stack.

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::webhooks::{webhook_routes, HealthResponse, WebhookAppState};
use crate::config::ServerConfig;

/// GET /healthz
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Builds the full application router.
pub fn app_router(state: WebhookAppState, server: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/healthz", get(healthz))
        .nest("/webhooks", webhook_routes(state, server.max_body_bytes))
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    match cors_layer(&server.cors_origins_list()) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }
    Some(CorsLayer::new().allow_origin(AllowOrigin::list(origins)))
}
