//! Webhook envelope and messaging events.
//!
//! Only the fields we act on are modelled; everything else Messenger sends
//! is ignored. The envelope is read field by field from the parsed JSON and
//! events are decoded one at a time, so an oddly shaped entry or event is
//! skipped without poisoning the rest of a batched delivery.

use pagechat_core::SenderId;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// `object` value for Page subscriptions.
pub const PAGE_OBJECT: &str = "page";

/// Top-level webhook body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebhookEnvelope {
    /// Subscription object type; `page` for Messenger. Empty when absent or
    /// not a string.
    pub object: String,
    /// Batched entries, kept raw. Empty when `entry` is absent or not an
    /// array.
    pub entry: Vec<JsonValue>,
}

impl WebhookEnvelope {
    /// Reads the envelope out of a parsed body. Never fails: missing or
    /// mistyped fields read as empty.
    #[must_use]
    pub fn from_value(value: JsonValue) -> Self {
        let JsonValue::Object(mut body) = value else {
            return Self::default();
        };
        let object = match body.remove("object") {
            Some(JsonValue::String(object)) => object,
            _ => String::new(),
        };
        let entry = match body.remove("entry") {
            Some(JsonValue::Array(entry)) => entry,
            _ => Vec::new(),
        };
        Self { object, entry }
    }

    /// Returns true for Page subscriptions.
    #[must_use]
    pub fn is_page(&self) -> bool {
        self.object == PAGE_OBJECT
    }

    /// Iterates over all raw messaging events across entries. Entries that
    /// are not objects, or whose `messaging` is not an array, contribute
    /// nothing.
    pub fn raw_events(&self) -> impl Iterator<Item = &JsonValue> {
        self.entry
            .iter()
            .filter_map(|entry| entry.get("messaging"))
            .filter_map(JsonValue::as_array)
            .flatten()
    }
}

/// A party to a messaging event.
#[derive(Debug, Clone, Deserialize)]
pub struct Participant {
    /// Page-scoped ID.
    pub id: String,
}

/// Message body of an inbound message event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundMessage {
    /// Message ID.
    #[serde(default)]
    pub mid: Option<String>,
    /// Text, absent for attachment-only messages.
    #[serde(default)]
    pub text: Option<String>,
    /// Attachments, kept opaque.
    #[serde(default)]
    pub attachments: Vec<JsonValue>,
}

/// A button click.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Postback {
    /// Developer-defined payload.
    #[serde(default)]
    pub payload: Option<String>,
    /// Button title.
    #[serde(default)]
    pub title: Option<String>,
}

/// A single inbound messaging event.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingEvent {
    /// Who sent it.
    #[serde(default)]
    pub sender: Option<Participant>,
    /// Who received it (our Page).
    #[serde(default)]
    pub recipient: Option<Participant>,
    /// Event time in epoch milliseconds.
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Present for message events.
    #[serde(default)]
    pub message: Option<InboundMessage>,
    /// Present for postback events.
    #[serde(default)]
    pub postback: Option<Postback>,
}

/// What a messaging event asks us to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload<'a> {
    /// A message with text.
    Text(&'a str),
    /// A message without text (attachments, stickers, ...).
    NonText,
    /// A button click; missing payloads read as empty.
    Postback(&'a str),
    /// Something we do not handle (reads, deliveries, ...).
    Unknown,
}

impl MessagingEvent {
    /// Decodes one raw event.
    ///
    /// # Errors
    ///
    /// Returns the decoding error if the value does not look like an event.
    pub fn from_value(value: &JsonValue) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// Returns the sender ID, if present.
    #[must_use]
    pub fn sender_id(&self) -> Option<SenderId> {
        self.sender.as_ref().map(|p| SenderId::new(p.id.as_str()))
    }

    /// Returns the recipient ID, if present.
    #[must_use]
    pub fn recipient_id(&self) -> Option<&str> {
        self.recipient.as_ref().map(|p| p.id.as_str())
    }

    /// Classifies the event. Messages take precedence over postbacks.
    #[must_use]
    pub fn payload(&self) -> EventPayload<'_> {
        if let Some(message) = &self.message {
            return match message.text.as_deref() {
                Some(text) => EventPayload::Text(text),
                None => EventPayload::NonText,
            };
        }
        if let Some(postback) = &self.postback {
            return EventPayload::Postback(postback.payload.as_deref().unwrap_or_default());
        }
        EventPayload::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(events: JsonValue) -> WebhookEnvelope {
        WebhookEnvelope::from_value(json!({
            "object": "page",
            "entry": [{"id": "61558633094614", "time": 1234567890, "messaging": events}]
        }))
    }

    fn single(event: JsonValue) -> MessagingEvent {
        MessagingEvent::from_value(&event).expect("event")
    }

    #[test]
    fn text_message() {
        let event = single(json!({
            "sender": {"id": "test_user_12345"},
            "recipient": {"id": "61558633094614"},
            "timestamp": 1234567890,
            "message": {"mid": "m1", "text": "Hello!"}
        }));

        assert_eq!(event.sender_id(), Some(SenderId::new("test_user_12345")));
        assert_eq!(event.recipient_id(), Some("61558633094614"));
        assert_eq!(event.payload(), EventPayload::Text("Hello!"));
    }

    #[test]
    fn attachment_only_message() {
        let event = single(json!({
            "sender": {"id": "1"},
            "message": {"mid": "m2", "attachments": [{"type": "image"}]}
        }));
        assert_eq!(event.payload(), EventPayload::NonText);
    }

    #[test]
    fn postback_with_and_without_payload() {
        let event = single(json!({"sender": {"id": "1"}, "postback": {"payload": "HELP", "title": "Help"}}));
        assert_eq!(event.payload(), EventPayload::Postback("HELP"));

        let event = single(json!({"sender": {"id": "1"}, "postback": {}}));
        assert_eq!(event.payload(), EventPayload::Postback(""));
    }

    #[test]
    fn delivery_receipts_are_unknown() {
        let event = single(json!({"sender": {"id": "1"}, "delivery": {"mids": ["m1"]}}));
        assert_eq!(event.payload(), EventPayload::Unknown);
    }

    #[test]
    fn envelope_flattens_entries() {
        let env = WebhookEnvelope::from_value(json!({
            "object": "page",
            "entry": [
                {"messaging": [{"sender": {"id": "a"}}]},
                {"messaging": [{"sender": {"id": "b"}}, {"sender": {"id": "c"}}]},
                {}
            ]
        }));

        assert!(env.is_page());
        assert_eq!(env.raw_events().count(), 3);
    }

    #[test]
    fn odd_events_fail_individually() {
        let env = envelope(json!([{"sender": "not-an-object"}, {"sender": {"id": "ok"}}]));
        let decoded: Vec<_> = env
            .raw_events()
            .map(MessagingEvent::from_value)
            .collect();

        assert!(decoded[0].is_err());
        assert!(decoded[1].is_ok());
    }

    #[test]
    fn non_page_objects_are_recognized() {
        let env = WebhookEnvelope::from_value(json!({"object": "instagram"}));
        assert!(!env.is_page());
        assert_eq!(env.raw_events().count(), 0);
    }

    #[test]
    fn mistyped_entries_do_not_hide_valid_ones() {
        let env = WebhookEnvelope::from_value(json!({
            "object": "page",
            "entry": [
                {"id": 61558633094614_u64, "time": "yesterday", "messaging": [{"sender": {"id": "a"}}]},
                {"messaging": null},
                {"messaging": {"sender": {"id": "not-a-list"}}},
                "not-an-entry",
                {"messaging": [{"sender": {"id": "b"}}]}
            ]
        }));

        let senders: Vec<_> = env
            .raw_events()
            .filter_map(|raw| MessagingEvent::from_value(raw).ok())
            .filter_map(|event| event.sender_id())
            .collect();
        assert_eq!(senders, vec![SenderId::new("a"), SenderId::new("b")]);
    }

    #[test]
    fn mistyped_envelope_fields_read_as_empty() {
        let env = WebhookEnvelope::from_value(json!({"object": 7, "entry": {"messaging": []}}));
        assert!(!env.is_page());
        assert!(env.entry.is_empty());

        assert_eq!(WebhookEnvelope::from_value(json!([1, 2])), WebhookEnvelope::default());
        assert_eq!(WebhookEnvelope::from_value(json!(null)), WebhookEnvelope::default());
    }
}
