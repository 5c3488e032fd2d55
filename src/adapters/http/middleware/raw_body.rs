//! Raw body capture for webhook routes.
//!
//! Buffers the request body once, exposes the exact bytes as a [`RawBody`]
//! extension, and hands an identical body to the rest of the stack. Signature
//! checks and payload parsing both read from the same buffer.

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::webhooks::ErrorResponse;

/// Exact pre-parse request body bytes.
#[derive(Debug, Clone)]
pub struct RawBody(pub Bytes);

/// Upper bound on buffered body size.
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit(pub usize);

pub async fn capture_raw_body(
    State(limit): State<BodyLimit>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, limit.0).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(
                route = %parts.uri.path(),
                limit = limit.0,
                error = %err,
                "Webhook body rejected"
            );
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ErrorResponse::new("payload_too_large")),
            )
                .into_response();
        }
    };

    parts.extensions.insert(RawBody(bytes.clone()));
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
