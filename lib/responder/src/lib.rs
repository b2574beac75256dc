//! Reply generation for pagechat.
//!
//! Two interchangeable strategies implement [`ResponseGenerator`]:
//!
//! - [`RuleResponder`]: keyword rules over a small per-sender state machine
//! - [`LlmResponder`]: persona prompt plus recent history sent to a model
//!
//! Both always produce a reply. Downstream failures are logged and turned
//! into canned text rather than surfaced to the caller.

pub mod llm;
pub mod replies;
pub mod rules;

use async_trait::async_trait;
use pagechat_conversation::{ContextStore, UserContext};
use pagechat_core::SenderId;
use serde::Deserialize;

pub use llm::{GenerationSettings, LlmResponder};
pub use rules::{Rule, RuleResponder, RULES};

/// Produces the reply for one inbound event.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Replies to a text message and updates the sender's context.
    async fn generate_response(&self, sender: &SenderId, text: &str) -> String;

    /// Replies to a button click.
    async fn handle_postback(&self, sender: &SenderId, payload: &str) -> String;
}

/// Which strategy the server runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponderKind {
    /// Keyword rules.
    #[default]
    Rules,
    /// Language model.
    Llm,
}

/// Loads a sender's context, starting fresh if the store fails.
async fn load_context(store: &dyn ContextStore, sender: &SenderId) -> UserContext {
    match store.get_or_default(sender).await {
        Ok(context) => context,
        Err(e) => {
            tracing::error!(error = %e, sender = %sender, "Failed to load context, starting fresh");
            UserContext::new()
        }
    }
}

/// Writes a sender's context back, logging failures.
async fn save_context(store: &dyn ContextStore, sender: &SenderId, context: UserContext) {
    if let Err(e) = store.put(sender, context).await {
        tracing::error!(error = %e, sender = %sender, "Failed to store context");
    }
}
