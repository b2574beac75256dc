//! Messenger Send API gateway.
//!
//! Delivery is best-effort: one POST, no retries. Callers get a `Result`
//! back and decide what to do with it; the webhook handler logs it and moves
//! on.

use crate::error::SendError;
use async_trait::async_trait;
use pagechat_core::SenderId;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Default Graph API host.
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com";

/// Default Graph API version.
pub const DEFAULT_GRAPH_API_VERSION: &str = "v18.0";

/// Result of a send attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The Graph API accepted the message.
    Delivered,
    /// No page access token is configured; nothing was sent.
    Skipped,
}

/// Trait for outbound message delivery.
#[async_trait]
pub trait SendApi: Send + Sync {
    /// Sends a text message to a Messenger user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    async fn send_text(
        &self,
        recipient: &SenderId,
        text: &str,
    ) -> pagechat_core::Result<SendOutcome, SendError>;
}

/// Connection settings for [`GraphSendApi`].
#[derive(Clone)]
pub struct GraphSendConfig {
    /// Page access token; `None` turns sends into no-ops.
    pub page_access_token: Option<String>,
    /// Graph API host.
    pub base_url: String,
    /// Graph API version path segment.
    pub api_version: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GraphSendConfig {
    /// Creates a configuration against the public Graph API.
    #[must_use]
    pub fn new(page_access_token: Option<String>) -> Self {
        Self {
            page_access_token,
            base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            api_version: DEFAULT_GRAPH_API_VERSION.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Overrides the Graph API host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the Graph API version.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for GraphSendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphSendConfig")
            .field(
                "page_access_token",
                &self.page_access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    recipient: Recipient<'a>,
    message: OutboundText<'a>,
}

#[derive(Serialize)]
struct Recipient<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct OutboundText<'a> {
    text: &'a str,
}

/// Send API client backed by the Graph API.
#[derive(Debug, Clone)]
pub struct GraphSendApi {
    client: reqwest::Client,
    config: GraphSendConfig,
}

impl GraphSendApi {
    /// Creates a client from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: GraphSendConfig) -> pagechat_core::Result<Self, SendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SendError::ClientSetup {
                reason: e.to_string(),
            })?;

        if config.page_access_token.as_deref().is_none_or(str::is_empty) {
            tracing::warn!("PAGE_ACCESS_TOKEN not set, replies will not be delivered");
        }

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/me/messages",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_version
        )
    }
}

#[async_trait]
impl SendApi for GraphSendApi {
    async fn send_text(
        &self,
        recipient: &SenderId,
        text: &str,
    ) -> pagechat_core::Result<SendOutcome, SendError> {
        let Some(token) = self
            .config
            .page_access_token
            .as_deref()
            .filter(|token| !token.is_empty())
        else {
            tracing::warn!(recipient = %recipient, "PAGE_ACCESS_TOKEN not set, cannot send messages");
            return Ok(SendOutcome::Skipped);
        };

        let body = SendRequest {
            recipient: Recipient {
                id: recipient.as_str(),
            },
            message: OutboundText { text },
        };

        let response = self
            .client
            .post(self.messages_url())
            .query(&[("access_token", token)])
            .json(&body)
            .send()
            .await
            .map_err(|e| SendError::Transport {
                reason: e.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Rejected {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        tracing::info!(recipient = %recipient, "Message sent successfully");
        Ok(SendOutcome::Delivered)
    }
}
