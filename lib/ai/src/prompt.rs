//! Prompt assembly.
//!
//! A conversation prompt is the persona system message, an optional system
//! line naming the user, then the sender's recent history in order.

use pagechat_conversation::Message;

/// Persona and behavioral directives sent as the first system message.
pub const DEFAULT_PERSONA: &str = "You are a friendly and helpful customer service assistant \
for a business that talks to its customers on Facebook Messenger. Be warm, professional, and \
concise. Help with questions about products and services, support requests, and general \
inquiries. If you do not know something specific such as prices, stock, or order status, say \
so and suggest contacting the support team instead of guessing. Use the user's name \
naturally when you know it. Keep every reply under 300 characters because this is a chat \
window.";

/// Builder for the message list sent to the model.
#[derive(Debug, Clone)]
pub struct ConversationPrompt<'a> {
    persona: &'a str,
    user_name: Option<&'a str>,
    history: &'a [Message],
}

impl<'a> ConversationPrompt<'a> {
    /// Starts a prompt with the given persona.
    #[must_use]
    pub fn new(persona: &'a str) -> Self {
        Self {
            persona,
            user_name: None,
            history: &[],
        }
    }

    /// Adds the user's known name as a second system line.
    #[must_use]
    pub fn with_user_name(mut self, name: Option<&'a str>) -> Self {
        self.user_name = name;
        self
    }

    /// Adds the conversation history.
    #[must_use]
    pub fn with_history(mut self, history: &'a [Message]) -> Self {
        self.history = history;
        self
    }

    /// Produces the ordered message list.
    #[must_use]
    pub fn into_messages(self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(Message::system(self.persona));
        if let Some(name) = self.user_name {
            messages.push(Message::system(format!("The user's name is {name}.")));
        }
        messages.extend(self.history.iter().cloned());
        messages
    }
}

/// Builds the one-off prompt describing a clicked button.
#[must_use]
pub fn postback_prompt(persona: &str, payload: &str) -> Vec<Message> {
    vec![
        Message::system(persona),
        Message::user(format!(
            "The user clicked a button with payload: {payload}. Respond appropriately."
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagechat_conversation::MessageRole;

    #[test]
    fn persona_comes_first_then_history() {
        let history = vec![Message::user("hi"), Message::assistant("hello!")];
        let messages = ConversationPrompt::new("persona")
            .with_history(&history)
            .into_messages();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], Message::system("persona"));
        assert_eq!(&messages[1..], history.as_slice());
    }

    #[test]
    fn known_name_adds_second_system_line() {
        let history = vec![Message::user("what do you sell?")];
        let messages = ConversationPrompt::new(DEFAULT_PERSONA)
            .with_user_name(Some("Maria"))
            .with_history(&history)
            .into_messages();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, MessageRole::System);
        assert!(messages[1].content.contains("Maria"));
        assert_eq!(messages[2].role, MessageRole::User);
    }

    #[test]
    fn postback_prompt_mentions_payload() {
        let messages = postback_prompt("persona", "GET_STARTED");
        assert_eq!(messages.len(), 2);
        assert!(messages[1].content.contains("GET_STARTED"));
    }
}
