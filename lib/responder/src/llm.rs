//! Language-model responder.

use crate::replies;
use crate::{ResponseGenerator, load_context, save_context};
use async_trait::async_trait;
use pagechat_ai::{ChatRequest, ConversationPrompt, DEFAULT_PERSONA, LlmBackend, postback_prompt};
use pagechat_conversation::{ContextStore, Message, TurnLocks, extract_name, introduces_self};
use pagechat_core::SenderId;
use std::sync::Arc;

/// Sampling settings for generated replies.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Persona system prompt.
    pub persona: String,
    /// Token cap for message replies.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Presence penalty.
    pub presence_penalty: f32,
    /// Frequency penalty.
    pub frequency_penalty: f32,
    /// Token cap for postback replies.
    pub postback_max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            persona: DEFAULT_PERSONA.to_string(),
            max_tokens: 150,
            temperature: 0.7,
            presence_penalty: 0.1,
            frequency_penalty: 0.1,
            postback_max_tokens: 100,
        }
    }
}

/// [`ResponseGenerator`] that asks a language model for every reply.
///
/// Each turn appends the user's message to the sender's history, sends the
/// persona plus that history to the backend, and appends the model's answer
/// on success. When the backend fails the sender gets a fixed apology and
/// the history keeps only the user's message.
pub struct LlmResponder {
    store: Arc<dyn ContextStore>,
    locks: TurnLocks,
    backend: Arc<dyn LlmBackend>,
    settings: GenerationSettings,
}

impl LlmResponder {
    /// Creates a responder with default settings.
    #[must_use]
    pub fn new(store: Arc<dyn ContextStore>, backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            store,
            locks: TurnLocks::new(),
            backend,
            settings: GenerationSettings::default(),
        }
    }

    /// Replaces the generation settings.
    #[must_use]
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    fn message_request(&self, messages: Vec<Message>) -> ChatRequest {
        ChatRequest::new(messages)
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature)
            .with_penalties(
                self.settings.presence_penalty,
                self.settings.frequency_penalty,
            )
    }
}

#[async_trait]
impl ResponseGenerator for LlmResponder {
    async fn generate_response(&self, sender: &SenderId, text: &str) -> String {
        let _turn = self.locks.acquire(sender).await;

        let mut context = load_context(self.store.as_ref(), sender).await;

        if context.name.is_none() && introduces_self(text) {
            if let Some(name) = extract_name(text) {
                tracing::debug!(sender = %sender, name = %name, "Captured name");
                context.remember_name(name);
            }
        }

        context.history.push(Message::user(text));

        let messages = ConversationPrompt::new(&self.settings.persona)
            .with_user_name(context.name())
            .with_history(context.history.messages())
            .into_messages();
        let request = self.message_request(messages);

        let reply = match self.backend.generate(&request).await {
            Ok(response) => {
                tracing::debug!(
                    sender = %sender,
                    model = %response.model,
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "Generated reply"
                );
                context.history.push(Message::assistant(response.content.as_str()));
                response.content
            }
            Err(e) => {
                tracing::error!(error = %e, sender = %sender, model = self.backend.model(), "Error generating response");
                replies::MODEL_UNAVAILABLE.to_string()
            }
        };

        save_context(self.store.as_ref(), sender, context).await;
        reply
    }

    async fn handle_postback(&self, sender: &SenderId, payload: &str) -> String {
        let request = ChatRequest::new(postback_prompt(&self.settings.persona, payload))
            .with_max_tokens(self.settings.postback_max_tokens)
            .with_temperature(self.settings.temperature);

        match self.backend.generate(&request).await {
            Ok(response) => response.content,
            Err(e) => {
                tracing::error!(error = %e, sender = %sender, payload, "Error handling postback");
                replies::postback_reply(payload).to_string()
            }
        }
    }
}
