//! Chat-completion backend for OpenAI-compatible endpoints.

use crate::backend::{ChatRequest, ChatResponse, LlmBackend, TokenUsage};
use crate::error::LlmError;
use async_trait::async_trait;
use pagechat_conversation::Message;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default API base for the hosted OpenAI service.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Connection settings for [`OpenAiBackend`].
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key; `None` disables the backend.
    pub api_key: Option<String>,
    /// API base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a configuration for the hosted service with default model.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// OpenAI-compatible chat-completion backend.
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    config: OpenAiConfig,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

impl OpenAiBackend {
    /// Creates a backend from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::RequestFailed {
                reason: e.to_string(),
            })?;

        if config.api_key.as_deref().is_none_or(str::is_empty) {
            tracing::warn!("OPENAI_API_KEY not set, language-model replies will use the fallback");
        }

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn generate(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let Some(api_key) = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
        else {
            return Err(LlmError::MissingCredential {
                provider: "openai".to_string(),
            });
        };

        let body = CompletionRequest {
            model: &self.config.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            presence_penalty: request.presence_penalty,
            frequency_penalty: request.frequency_penalty,
        };

        let url = self.completions_url();
        tracing::debug!(
            endpoint = %url,
            model = %self.config.model,
            messages = request.messages.len(),
            "Requesting chat completion"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::RequestFailed {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(LlmError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse =
            response
                .json()
                .await
                .map_err(|e| LlmError::ResponseParseFailed {
                    reason: e.to_string(),
                })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyCompletion)?;

        let usage = parsed
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(ChatResponse {
            content,
            usage,
            model: parsed.model.unwrap_or_else(|| self.config.model.clone()),
        })
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
