//! Webhook error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Errors returned to Messenger by the webhook routes.
///
/// Failures past the parsing stage (model calls, sends) are never reported
/// here; they are logged and the delivery is still acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// Failed verification handshake.
    Forbidden,
    /// Delivery signature missing or wrong.
    InvalidSignature,
    /// The body is not JSON.
    MalformedInput { reason: String },
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forbidden => write!(f, "forbidden"),
            Self::InvalidSignature => write!(f, "invalid webhook signature"),
            Self::MalformedInput { reason } => write!(f, "malformed webhook body: {}", reason),
        }
    }
}

impl std::error::Error for WebhookError {}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        match self {
            Self::Forbidden => {
                (StatusCode::FORBIDDEN, Json(json!({"detail": "Forbidden"}))).into_response()
            }
            Self::InvalidSignature => (
                StatusCode::FORBIDDEN,
                Json(json!({"detail": "Invalid signature"})),
            )
                .into_response(),
            Self::MalformedInput { reason } => {
                tracing::warn!(error = %reason, "Invalid JSON in webhook body");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"detail": "Invalid JSON"})),
                )
                    .into_response()
            }
        }
    }
}
