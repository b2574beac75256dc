//! Keyword rule engine.
//!
//! Rules are evaluated top to bottom against the lower-cased, trimmed text;
//! the first match produces the reply and may update the sender's context.
//! Matching is plain substring containment, so short keywords also fire
//! inside longer words ("hi" in "this").

use crate::replies;
use crate::{ResponseGenerator, load_context, save_context};
use async_trait::async_trait;
use pagechat_conversation::{ContextStore, DialogState, TurnLocks, UserContext, extract_name};
use pagechat_core::SenderId;
use std::sync::Arc;

const GREETINGS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];
const HELP_KEYWORDS: &[&str] = &["help", "support", "assistance"];
const PRODUCT_KEYWORDS: &[&str] = &["product", "service", "price", "cost", "buy", "purchase"];
const PRICE_KEYWORDS: &[&str] = &["price", "cost"];
const THANKS_KEYWORDS: &[&str] = &["thank", "thanks", "appreciate"];
const FAREWELL_KEYWORDS: &[&str] = &["bye", "goodbye", "see you", "farewell"];
const WH_KEYWORDS: &[&str] = &["how", "what", "when", "where", "why", "who"];

/// The text of one inbound message, in both forms the rules need.
#[derive(Debug, Clone)]
pub struct RuleInput<'a> {
    /// Text as received.
    pub raw: &'a str,
    /// Lower-cased and trimmed.
    pub normalized: String,
}

impl<'a> RuleInput<'a> {
    /// Normalizes a message.
    #[must_use]
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            normalized: raw.to_lowercase().trim().to_string(),
        }
    }

    fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.normalized.contains(k))
    }
}

/// One entry of the rule table.
pub struct Rule {
    /// Rule name, for logs.
    pub name: &'static str,
    /// Whether the rule applies.
    pub matches: fn(&RuleInput<'_>, &UserContext) -> bool,
    /// Produces the reply, possibly updating the context.
    pub respond: fn(&RuleInput<'_>, &mut UserContext) -> String,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// The rule table, in priority order. The last rule always matches.
pub const RULES: &[Rule] = &[
    Rule {
        name: "greeting",
        matches: |input, _| input.contains_any(GREETINGS),
        respond: |_, ctx| match ctx.name() {
            Some(name) => replies::greet_known(name),
            None => {
                ctx.state = DialogState::WaitingForName;
                replies::ASK_NAME.to_string()
            }
        },
    },
    Rule {
        name: "name_capture",
        matches: |_, ctx| ctx.state.is_waiting_for_name(),
        respond: |input, ctx| match extract_name(input.raw) {
            Some(name) => {
                let reply = replies::name_captured(&name);
                ctx.remember_name(name);
                reply
            }
            None => replies::ASK_NAME_AGAIN.to_string(),
        },
    },
    Rule {
        name: "help",
        matches: |input, _| input.contains_any(HELP_KEYWORDS),
        respond: |_, _| replies::HELP.to_string(),
    },
    Rule {
        name: "product",
        matches: |input, _| input.contains_any(PRODUCT_KEYWORDS),
        respond: |input, _| {
            if input.contains_any(PRICE_KEYWORDS) {
                replies::PRICING.to_string()
            } else if input.normalized.contains("product") {
                replies::PRODUCT.to_string()
            } else {
                replies::PRODUCT_GENERIC.to_string()
            }
        },
    },
    Rule {
        name: "thanks",
        matches: |input, _| input.contains_any(THANKS_KEYWORDS),
        respond: |_, _| replies::THANKS.to_string(),
    },
    Rule {
        name: "farewell",
        matches: |input, _| input.contains_any(FAREWELL_KEYWORDS),
        respond: |_, ctx| replies::farewell(ctx.name()),
    },
    Rule {
        name: "question",
        matches: |input, _| input.raw.trim().ends_with('?'),
        respond: |input, _| {
            if input.contains_any(WH_KEYWORDS) {
                replies::QUESTION_DEFLECT.to_string()
            } else {
                replies::QUESTION_CLARIFY.to_string()
            }
        },
    },
    Rule {
        name: "fallback",
        matches: |_, _| true,
        respond: |input, _| {
            let index = input.normalized.chars().count() % replies::DEFAULT_REPLIES.len();
            replies::DEFAULT_REPLIES[index].to_string()
        },
    },
];

/// Runs the rule table over one message.
///
/// Returns the name of the rule that fired and the reply. Pure apart from
/// the context mutation, so identical input and context give identical
/// output.
pub fn apply_rules(text: &str, context: &mut UserContext) -> (&'static str, String) {
    let input = RuleInput::new(text);
    for rule in RULES {
        if (rule.matches)(&input, context) {
            return (rule.name, (rule.respond)(&input, context));
        }
    }
    // The fallback rule always matches; this only guards an edited table.
    ("fallback", replies::DEFAULT_REPLIES[0].to_string())
}

/// Rule-based [`ResponseGenerator`].
pub struct RuleResponder {
    store: Arc<dyn ContextStore>,
    locks: TurnLocks,
}

impl RuleResponder {
    /// Creates a responder over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn ContextStore>) -> Self {
        Self {
            store,
            locks: TurnLocks::new(),
        }
    }
}

#[async_trait]
impl ResponseGenerator for RuleResponder {
    async fn generate_response(&self, sender: &SenderId, text: &str) -> String {
        let _turn = self.locks.acquire(sender).await;

        let mut context = load_context(self.store.as_ref(), sender).await;
        let (rule, reply) = apply_rules(text, &mut context);
        tracing::debug!(sender = %sender, rule, state = ?context.state, "Rule matched");

        save_context(self.store.as_ref(), sender, context).await;
        reply
    }

    async fn handle_postback(&self, sender: &SenderId, payload: &str) -> String {
        tracing::debug!(sender = %sender, payload, "Answering postback from table");
        replies::postback_reply(payload).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagechat_conversation::InMemoryContextStore;

    fn reply(text: &str) -> String {
        apply_rules(text, &mut UserContext::new()).1
    }

    fn rule(text: &str) -> &'static str {
        apply_rules(text, &mut UserContext::new()).0
    }

    fn named(name: &str) -> UserContext {
        let mut ctx = UserContext::new();
        ctx.remember_name(name);
        ctx
    }

    #[test]
    fn last_rule_is_catch_all() {
        let last = RULES.last().expect("rules");
        assert_eq!(last.name, "fallback");
        assert!((last.matches)(&RuleInput::new(""), &UserContext::new()));
    }

    #[test]
    fn greeting_without_name_asks_for_it() {
        let mut ctx = UserContext::new();
        let (rule, reply) = apply_rules("Hello", &mut ctx);

        assert_eq!(rule, "greeting");
        assert_eq!(reply, replies::ASK_NAME);
        assert_eq!(ctx.state, DialogState::WaitingForName);
    }

    #[test]
    fn greeting_with_name_greets_by_name() {
        let mut ctx = named("Maria");
        let (_, reply) = apply_rules("good morning!", &mut ctx);

        assert_eq!(reply, "Hello again, Maria! How can I help you today?");
        assert_eq!(ctx.state, DialogState::Default);
    }

    #[test]
    fn greeting_outranks_waiting_for_name() {
        let mut ctx = UserContext::new();
        ctx.state = DialogState::WaitingForName;

        let (rule, _) = apply_rules("hey there", &mut ctx);
        assert_eq!(rule, "greeting");
        assert_eq!(ctx.state, DialogState::WaitingForName);
    }

    #[test]
    fn name_capture_success_and_retry() {
        let mut ctx = UserContext::new();
        ctx.state = DialogState::WaitingForName;

        let (rule, reply) = apply_rules("call me maybe", &mut ctx);
        assert_eq!(rule, "name_capture");
        assert_eq!(reply, replies::ASK_NAME_AGAIN);
        assert_eq!(ctx.state, DialogState::WaitingForName);

        let (_, reply) = apply_rules("My name is Maria", &mut ctx);
        assert_eq!(reply, "Nice to meet you, Maria! How can I assist you today?");
        assert_eq!(ctx.name(), Some("Maria"));
        assert_eq!(ctx.state, DialogState::Default);
    }

    #[test]
    fn help_keywords() {
        assert_eq!(reply("I need assistance"), replies::HELP);
        assert_eq!(rule("Support please"), "help");
    }

    #[test]
    fn product_branches() {
        assert_eq!(reply("What does it cost"), replies::PRICING);
        assert_eq!(reply("tell me about the price of your product"), replies::PRICING);
        assert_eq!(reply("show me a product"), replies::PRODUCT);
        assert_eq!(reply("I want to buy"), replies::PRODUCT_GENERIC);
    }

    #[test]
    fn thanks_and_farewell() {
        assert_eq!(reply("Thanks a lot"), replies::THANKS);
        assert_eq!(
            reply("goodbye"),
            "Goodbye! Feel free to message me anytime. Have a great day!"
        );

        let mut ctx = named("Carlos");
        let (_, reply) = apply_rules("see you later", &mut ctx);
        assert_eq!(
            reply,
            "Goodbye, Carlos! Feel free to message me anytime. Have a great day!"
        );
    }

    #[test]
    fn questions() {
        assert_eq!(reply("Where are you located?"), replies::QUESTION_DEFLECT);
        assert_eq!(reply("Are you open today?  "), replies::QUESTION_CLARIFY);
    }

    #[test]
    fn keywords_match_inside_words() {
        // "this" contains "hi".
        assert_eq!(rule("is this working"), "greeting");
    }

    #[test]
    fn fallback_is_chosen_by_length() {
        // "ok" has 2 characters.
        assert_eq!(reply("ok"), replies::DEFAULT_REPLIES[2]);
        // Surrounding whitespace does not count.
        assert_eq!(reply("   ok   "), replies::DEFAULT_REPLIES[2]);
        // "great" has 5 characters.
        assert_eq!(reply("Great"), replies::DEFAULT_REPLIES[0]);
        assert_eq!(reply(""), replies::DEFAULT_REPLIES[0]);
    }

    #[test]
    fn rules_are_deterministic() {
        let inputs = ["Hello", "Carlos", "price?", "why not?", "random words", "bye"];
        let starts = [UserContext::new(), named("Ana"), {
            let mut ctx = UserContext::new();
            ctx.state = DialogState::WaitingForName;
            ctx
        }];

        for start in &starts {
            for input in inputs {
                let mut first = start.clone();
                let mut second = start.clone();
                assert_eq!(apply_rules(input, &mut first), apply_rules(input, &mut second));
                assert_eq!(first, second);
            }
        }
    }

    #[tokio::test]
    async fn hello_then_name_scenario() {
        let store = Arc::new(InMemoryContextStore::new());
        let responder = RuleResponder::new(store.clone());
        let sender = SenderId::new("new_user");

        let first = responder.generate_response(&sender, "Hello").await;
        assert_eq!(first, replies::ASK_NAME);
        let ctx = store.get(&sender).await.expect("get").expect("context");
        assert_eq!(ctx.state, DialogState::WaitingForName);

        let second = responder.generate_response(&sender, "Carlos").await;
        assert!(second.contains("Carlos"));
        let ctx = store.get(&sender).await.expect("get").expect("context");
        assert_eq!(ctx.state, DialogState::Default);
        assert_eq!(ctx.name(), Some("Carlos"));

        let third = responder.generate_response(&sender, "hi again").await;
        assert_eq!(third, "Hello again, Carlos! How can I help you today?");
    }

    #[tokio::test]
    async fn postbacks_do_not_touch_the_store() {
        let store = Arc::new(InMemoryContextStore::new());
        let responder = RuleResponder::new(store.clone());

        let reply = responder
            .handle_postback(&SenderId::new("1"), "CONTACT_SUPPORT")
            .await;
        assert!(reply.contains("support@example.com"));
        assert_eq!(store.len().await.expect("len"), 0);
    }
}
