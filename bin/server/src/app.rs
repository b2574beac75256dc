//! Application state and router.

use crate::webhook;
use axum::{Json, Router, extract::State, routing::get};
use pagechat_messenger::{SendApi, SignatureVerifier};
use pagechat_responder::ResponseGenerator;
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
pub struct AppState {
    /// Token expected during the registration handshake.
    pub verify_token: String,
    /// Name reported by the health endpoint.
    pub app_name: String,
    /// Checks delivery signatures.
    pub verifier: SignatureVerifier,
    /// Produces replies.
    pub responder: Arc<dyn ResponseGenerator>,
    /// Delivers replies.
    pub sender: Arc<dyn SendApi>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        verify_token: impl Into<String>,
        app_name: impl Into<String>,
        verifier: SignatureVerifier,
        responder: Arc<dyn ResponseGenerator>,
        sender: Arc<dyn SendApi>,
    ) -> Self {
        Self {
            verify_token: verify_token.into(),
            app_name: app_name.into(),
            verifier,
            responder,
            sender,
        }
    }
}

/// Builds the HTTP router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/webhook", get(webhook::verify).post(webhook::receive))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<JsonValue> {
    Json(json!({"message": format!("{} API is running!", state.app_name)}))
}
