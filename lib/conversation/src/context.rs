//! What we remember about a single sender.
//!
//! A context is created lazily on the first message from a sender and lives
//! for the lifetime of the process. The rule-based responder drives
//! [`DialogState`]; the language-model responder feeds
//! [`ConversationHistory`] into its prompt. Both share the captured name.

use crate::message::Message;
use serde::{Deserialize, Serialize};

/// Maximum number of messages retained per sender.
pub const HISTORY_LIMIT: usize = 10;

/// Dialog state for the rule-based responder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    /// No pending question.
    #[default]
    Default,
    /// We asked for the user's name and expect it in the next message.
    WaitingForName,
}

impl DialogState {
    /// Returns true if the next message should be treated as a name.
    #[must_use]
    pub fn is_waiting_for_name(&self) -> bool {
        matches!(self, Self::WaitingForName)
    }
}

/// Chronological message history capped at [`HISTORY_LIMIT`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message, dropping the oldest entries beyond the limit.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        if self.messages.len() > HISTORY_LIMIT {
            let excess = self.messages.len() - HISTORY_LIMIT;
            self.messages.drain(..excess);
        }
    }

    /// Returns the retained messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of retained messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the most recent message, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Per-sender conversation state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    /// The sender's name, once captured.
    pub name: Option<String>,
    /// Dialog state (rule-based responder).
    pub state: DialogState,
    /// Recent messages (language-model responder).
    pub history: ConversationHistory,
}

impl UserContext {
    /// Creates a fresh context for a sender we have not seen before.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Records the sender's name and clears any pending name question.
    pub fn remember_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
        self.state = DialogState::Default;
    }
}
