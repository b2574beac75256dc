//! Messenger Platform plumbing for pagechat.
//!
//! This crate provides:
//!
//! - **Signature**: `X-Hub-Signature-256` verification of webhook deliveries
//! - **Events**: the webhook envelope and messaging event types
//! - **Send**: the [`SendApi`] gateway and its Graph API implementation

pub mod error;
pub mod event;
pub mod send;
pub mod signature;

pub use error::SendError;
pub use event::{EventPayload, MessagingEvent, WebhookEnvelope};
pub use send::{GraphSendApi, GraphSendConfig, SendApi, SendOutcome};
pub use signature::{SIGNATURE_HEADER, SignatureVerifier, sign};
