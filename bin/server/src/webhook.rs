//! Messenger webhook routes.
//!
//! `GET /webhook` answers the one-time registration handshake. `POST
//! /webhook` receives event deliveries: the raw body is checked against
//! `X-Hub-Signature-256` before anything is parsed, then every messaging
//! event is answered in order. Once the body parses, the delivery is
//! acknowledged no matter what happens downstream, because Messenger
//! retries anything that is not a 200.

use crate::app::AppState;
use crate::error::WebhookError;
use axum::{
    Json,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::HeaderMap,
};
use pagechat_core::{DeliveryId, SenderId};
use pagechat_messenger::{
    EventPayload, MessagingEvent, SIGNATURE_HEADER, SendOutcome, WebhookEnvelope,
};
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;
use tracing::Instrument;

/// Registration handshake parameters.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
}

/// Echoes the challenge when the mode and token check out.
///
/// A query string that does not decode (repeated keys, for instance) is a
/// failed handshake like any other.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    query: Result<Query<VerifyQuery>, QueryRejection>,
) -> Result<String, WebhookError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Undecodable verification query");
        WebhookError::Forbidden
    })?;
    let subscribing = query.mode.as_deref() == Some("subscribe");
    let token_matches = query.verify_token.as_deref() == Some(state.verify_token.as_str());

    if subscribing && token_matches {
        tracing::info!("Webhook verified successfully");
        Ok(query.challenge.unwrap_or_default())
    } else {
        tracing::warn!(mode = ?query.mode, "Webhook verification failed");
        Err(WebhookError::Forbidden)
    }
}

/// Receives a signed event delivery.
pub async fn receive(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<JsonValue>, WebhookError> {
    let delivery = DeliveryId::new();
    let span = tracing::info_span!("webhook_delivery", delivery_id = %delivery);

    async move {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if !state.verifier.verify(&body, signature) {
            tracing::warn!("Invalid webhook signature");
            return Err(WebhookError::InvalidSignature);
        }

        let value: JsonValue =
            serde_json::from_slice(&body).map_err(|e| WebhookError::MalformedInput {
                reason: e.to_string(),
            })?;

        let envelope = WebhookEnvelope::from_value(value);
        if envelope.is_page() {
            for raw in envelope.raw_events() {
                dispatch(&state, raw).await;
            }
        } else {
            tracing::debug!(object = %envelope.object, "Ignoring non-page delivery");
        }

        Ok(Json(json!({"status": "EVENT_RECEIVED"})))
    }
    .instrument(span)
    .await
}

async fn dispatch(state: &AppState, raw: &JsonValue) {
    let event = match MessagingEvent::from_value(raw) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(error = %e, "Skipping undecodable messaging event");
            return;
        }
    };

    let Some(sender) = event.sender_id() else {
        tracing::debug!("Skipping messaging event without sender");
        return;
    };

    let reply = match event.payload() {
        EventPayload::Text(text) => {
            tracing::info!(sender = %sender, "Received message");
            state.responder.generate_response(&sender, text).await
        }
        EventPayload::Postback(payload) => {
            tracing::info!(sender = %sender, payload, "Received postback");
            state.responder.handle_postback(&sender, payload).await
        }
        EventPayload::NonText => {
            tracing::debug!(sender = %sender, "Skipping message without text");
            return;
        }
        EventPayload::Unknown => {
            tracing::debug!(sender = %sender, "Ignoring unhandled event type");
            return;
        }
    };

    deliver(state, &sender, &reply).await;
}

async fn deliver(state: &AppState, recipient: &SenderId, text: &str) {
    match state.sender.send_text(recipient, text).await {
        Ok(SendOutcome::Delivered) => {}
        Ok(SendOutcome::Skipped) => {
            tracing::debug!(recipient = %recipient, "Reply not delivered, no page token");
        }
        Err(report) => {
            tracing::error!(error = %report, recipient = %recipient, "Failed to send message");
        }
    }
}
