//! Mapping of delivery failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::dto::{ErrorResponse, InvalidPayloadResponse};
use crate::application::handlers::ingest::DeliveryError;
use crate::domain::sync::SyncError;

#[derive(Debug, Error)]
pub enum WebhookApiError {
    #[error("request body is not valid JSON")]
    InvalidJson,

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("delivery task aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

fn fault() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("internal_error")),
    )
        .into_response()
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        match self {
            WebhookApiError::InvalidJson => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new("invalid_json"))).into_response()
            }
            WebhookApiError::Delivery(DeliveryError::MissingIdempotencyKey) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("missing_idempotency_key")),
            )
                .into_response(),
            WebhookApiError::Delivery(DeliveryError::Rejected(SyncError::InvalidPayload(err))) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(InvalidPayloadResponse::new(err.issues)),
            )
                .into_response(),
            WebhookApiError::Delivery(DeliveryError::Rejected(SyncError::Business(err))) => {
                (err.status, Json(err.body)).into_response()
            }
            other => {
                tracing::error!(error = %other, "Webhook delivery fault");
                fault()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainError;
    use crate::domain::sync::{BusinessError, PayloadIssue, PayloadValidationError};
    use serde_json::{json, Value};

    async fn body_of(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_key_maps_to_400() {
        let response = WebhookApiError::from(DeliveryError::MissingIdempotencyKey).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_of(response).await,
            json!({"ok": false, "error": "missing_idempotency_key"})
        );
    }

    #[tokio::test]
    async fn invalid_payload_maps_to_422() {
        let err = DeliveryError::Rejected(SyncError::InvalidPayload(PayloadValidationError {
            issues: vec![PayloadIssue::new("version", "Required")],
        }));
        let response = WebhookApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_of(response).await["details"][0]["path"], "version");
    }

    #[tokio::test]
    async fn business_error_uses_its_own_response() {
        let err = DeliveryError::Rejected(SyncError::Business(BusinessError::campaign_not_found(
            "C9",
        )));
        let response = WebhookApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_of(response).await,
            json!({"ok": false, "error": "campaign_not_found"})
        );
    }

    #[tokio::test]
    async fn mark_failed_failure_is_a_fault() {
        let err = DeliveryError::MarkFailed {
            original: SyncError::Business(BusinessError::campaign_not_found("C9")),
            cause: DomainError::database("connection reset"),
        };
        let response = WebhookApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body, json!({"ok": false, "error": "internal_error"}));
    }

    #[tokio::test]
    async fn infrastructure_rejection_does_not_leak_detail() {
        let err = DeliveryError::Rejected(SyncError::Infrastructure(DomainError::database(
            "relation \"events\" does not exist",
        )));
        let response = WebhookApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await["error"], "internal_error");
    }
}
