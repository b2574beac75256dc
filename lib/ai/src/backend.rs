//! LLM backend abstraction.
//!
//! Responders build a [`ChatRequest`] and hand it to whichever
//! [`LlmBackend`] the server was configured with.

use crate::error::LlmError;
use async_trait::async_trait;
use pagechat_conversation::Message;
use serde::{Deserialize, Serialize};

/// A chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Ordered messages: system prompt(s) first, then history.
    pub messages: Vec<Message>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Temperature for sampling.
    pub temperature: Option<f32>,
    /// Penalty for tokens already present in the text.
    pub presence_penalty: Option<f32>,
    /// Penalty proportional to token frequency in the text.
    pub frequency_penalty: Option<f32>,
}

impl ChatRequest {
    /// Creates a request over the given messages with provider defaults.
    #[must_use]
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            max_tokens: None,
            temperature: None,
            presence_penalty: None,
            frequency_penalty: None,
        }
    }

    /// Sets the max tokens.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the presence and frequency penalties.
    #[must_use]
    pub fn with_penalties(mut self, presence: f32, frequency: f32) -> Self {
        self.presence_penalty = Some(presence);
        self.frequency_penalty = Some(frequency);
        self
    }
}

/// A response from an LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated content.
    pub content: String,
    /// Token usage statistics.
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of input tokens.
    pub input_tokens: u32,
    /// Number of output tokens.
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Returns the total number of tokens.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Trait for LLM backends.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generates a completion for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is not configured, unreachable, or
    /// answers with something other than a usable completion.
    async fn generate(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError>;

    /// Returns the model name.
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_builder() {
        let request = ChatRequest::new(vec![Message::system("Be brief."), Message::user("Hi")])
            .with_max_tokens(150)
            .with_temperature(0.7)
            .with_penalties(0.1, 0.2);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.max_tokens, Some(150));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.presence_penalty, Some(0.1));
        assert_eq!(request.frequency_penalty, Some(0.2));
    }

    #[test]
    fn token_usage_total() {
        let usage = TokenUsage {
            input_tokens: 100,
            output_tokens: 50,
        };
        assert_eq!(usage.total(), 150);
    }
}
