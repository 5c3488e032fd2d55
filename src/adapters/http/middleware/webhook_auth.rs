//! Verifier middleware for webhook routes.
//!
//! ```text
//! Request → capture_raw_body → webhook_auth → handler
//!                                   ↓
//!                     VerifiedSource in extensions
//! ```
//!
//! Every attempt is logged. Failures are logged immediately with their
//! reason; successes are logged once the handler has produced a response so
//! the entry carries the final status.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::raw_body::RawBody;
use crate::adapters::http::webhooks::ErrorResponse;
use crate::domain::webhook::{DeliveryCredentials, WebhookVerifier};

pub const SIGNATURE_HEADER: &str = "x-signature";
pub const TIMESTAMP_HEADER: &str = "x-timestamp";
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Shared verifier, built once from configuration.
pub type VerifierState = Arc<WebhookVerifier>;

pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

pub async fn webhook_auth(
    State(verifier): State<VerifierState>,
    mut request: Request,
    next: Next,
) -> Response {
    let mode = verifier.mode();
    let route = request.uri().path().to_string();
    let idempotency_key = header_str(request.headers(), IDEMPOTENCY_KEY_HEADER).map(str::to_string);

    let verified = {
        let headers = request.headers();
        let credentials = DeliveryCredentials {
            authorization: header_str(headers, header::AUTHORIZATION.as_str()),
            signature: header_str(headers, SIGNATURE_HEADER),
            timestamp: header_str(headers, TIMESTAMP_HEADER),
            raw_body: request.extensions().get::<RawBody>().map(|raw| raw.0.as_ref()),
        };
        verifier.verify(&credentials)
    };

    match verified {
        Ok(source) => {
            let label = source.label.clone();
            request.extensions_mut().insert(source);
            let response = next.run(request).await;
            tracing::info!(
                mode = mode.as_str(),
                route = %route,
                idempotency_key = ?idempotency_key,
                source = ?label,
                status = response.status().as_u16(),
                "Webhook authenticated"
            );
            response
        }
        Err(failure) => {
            tracing::warn!(
                mode = mode.as_str(),
                route = %route,
                idempotency_key = ?idempotency_key,
                reason = failure.reason(),
                "Webhook authentication failed"
            );
            (failure.status_code(), Json(ErrorResponse::new(failure.code()))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::middleware::{capture_raw_body, BodyLimit};
    use crate::domain::webhook::{compute_signature, BearerToken, VerifiedSource};
    use axum::{body::Body, http::StatusCode, middleware, routing::post, Extension, Router};
    use secrecy::SecretString;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn whoami(Extension(source): Extension<VerifiedSource>) -> String {
        source.label.unwrap_or_else(|| source.mode.as_str().to_string())
    }

    fn app(verifier: WebhookVerifier) -> Router {
        Router::new()
            .route("/hook", post(whoami))
            .route_layer(middleware::from_fn_with_state(Arc::new(verifier), webhook_auth))
            .route_layer(middleware::from_fn_with_state(BodyLimit(1024), capture_raw_body))
    }

    fn bearer_app() -> Router {
        app(WebhookVerifier::bearer(&[BearerToken {
            token: SecretString::new("abc".to_string()),
            source: Some("crm".to_string()),
        }]))
    }

    async fn error_code(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        json["error"].as_str().unwrap().to_string()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Bearer mode
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn bearer_token_resolves_source_label() {
        let response = bearer_app()
            .oneshot(
                axum::http::Request::post("/hook")
                    .header("Authorization", "bearer abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 64).await.unwrap();
        assert_eq!(&body[..], b"crm");
    }

    #[tokio::test]
    async fn wrong_scheme_is_a_bad_request() {
        let response = bearer_app()
            .oneshot(
                axum::http::Request::post("/hook")
                    .header("Authorization", "Token abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "invalid_authorization_scheme");
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let response = bearer_app()
            .oneshot(axum::http::Request::post("/hook").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "missing_authorization_header");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // HMAC mode
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn signature_over_captured_body_is_accepted() {
        let body = r#"{"x":1}"#;
        let ts = chrono::Utc::now().timestamp().to_string();
        let signature = compute_signature("s3cret-value", &ts, body.as_bytes());

        let response = app(WebhookVerifier::hmac(
            SecretString::new("s3cret-value".to_string()),
            300,
        ))
        .oneshot(
            axum::http::Request::post("/hook")
                .header(SIGNATURE_HEADER, signature)
                .header(TIMESTAMP_HEADER, ts)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn tampered_body_is_rejected() {
        let ts = chrono::Utc::now().timestamp().to_string();
        let signature = compute_signature("s3cret-value", &ts, br#"{"x":1}"#);

        let response = app(WebhookVerifier::hmac(
            SecretString::new("s3cret-value".to_string()),
            300,
        ))
        .oneshot(
            axum::http::Request::post("/hook")
                .header(SIGNATURE_HEADER, signature)
                .header(TIMESTAMP_HEADER, ts)
                .body(Body::from(r#"{"x":2}"#))
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "invalid_signature");
    }

    #[tokio::test]
    async fn uncaptured_body_is_a_bad_request() {
        let verifier = Arc::new(WebhookVerifier::hmac(
            SecretString::new("s3cret-value".to_string()),
            300,
        ));
        let app = Router::new()
            .route("/hook", post(whoami))
            .route_layer(middleware::from_fn_with_state(verifier, webhook_auth));

        let response = app
            .oneshot(
                axum::http::Request::post("/hook")
                    .header(SIGNATURE_HEADER, "00")
                    .header(TIMESTAMP_HEADER, "1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "missing_raw_body");
    }
}
