//! Canned reply text.

/// Help text listing what the bot can do.
pub const HELP: &str = "I can help you with:
• General questions and information
• Product and service inquiries
• Support and assistance
• Just having a conversation!

Feel free to ask me anything or just say hello! 😊";

/// Greeting for a sender whose name we do not know yet.
pub const ASK_NAME: &str = "Hello! Welcome to our chatbot. What's your name?";

/// Follow-up when no name could be extracted.
pub const ASK_NAME_AGAIN: &str =
    "I'd love to know your name! Could you tell me what I should call you?";

/// Pricing questions.
pub const PRICING: &str = "For pricing information, please visit our website or contact our sales team. I can connect you with them if you'd like!";

/// Product questions.
pub const PRODUCT: &str =
    "We offer various products and services. What specific type of product are you interested in?";

/// Other buying/service questions.
pub const PRODUCT_GENERIC: &str = "I'd be happy to help you learn about our products and services! What specifically are you looking for?";

/// Thanks.
pub const THANKS: &str = "You're very welcome! Is there anything else I can help you with?";

/// Open WH-questions we cannot answer in detail.
pub const QUESTION_DEFLECT: &str = "That's a great question! While I try my best to help, for detailed information I'd recommend contacting our support team or checking our website. Is there something specific I can help you with right now?";

/// Other questions.
pub const QUESTION_CLARIFY: &str = "I'd love to help answer your question! Could you provide a bit more detail so I can give you the best response?";

/// Fallback replies, picked by message length.
pub const DEFAULT_REPLIES: [&str; 5] = [
    "I understand! Tell me more about what you're looking for.",
    "Interesting! How can I help you with that?",
    "I'm here to help! Could you tell me more about what you need?",
    "Thanks for reaching out! What can I do for you today?",
    "I'd love to assist you! Can you provide a bit more detail?",
];

/// Reply when the language model is unavailable.
pub const MODEL_UNAVAILABLE: &str =
    "I'm sorry, I'm having trouble processing your request right now. Please try again later.";

/// Greeting for a sender whose name we know.
#[must_use]
pub fn greet_known(name: &str) -> String {
    format!("Hello again, {name}! How can I help you today?")
}

/// Acknowledges a captured name.
#[must_use]
pub fn name_captured(name: &str) -> String {
    format!("Nice to meet you, {name}! How can I assist you today?")
}

/// Goodbye, personalized when the name is known.
#[must_use]
pub fn farewell(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => {
            format!("Goodbye, {name}! Feel free to message me anytime. Have a great day!")
        }
        _ => "Goodbye! Feel free to message me anytime. Have a great day!".to_string(),
    }
}

/// Fixed reply for a button payload.
#[must_use]
pub fn postback_reply(payload: &str) -> &'static str {
    match payload {
        "GET_STARTED" => "Welcome! I'm here to help you. What can I do for you today?",
        "HELP" => HELP,
        "CONTACT_SUPPORT" => {
            "You can contact our support team at support@example.com or call +1-234-567-8900"
        }
        _ => "Thanks for clicking that button! How can I help you?",
    }
}
