//! Conversation state for pagechat.
//!
//! This crate provides:
//!
//! - **Context**: what we remember about each sender (name, dialog state,
//!   bounded message history)
//! - **Context Store**: the injectable storage seam and its in-memory backing
//! - **Turn Locks**: per-sender serialization of read-modify-write turns
//! - **Name extraction**: the heuristic shared by both responders

pub mod context;
pub mod error;
pub mod message;
pub mod name;
pub mod store;

pub use context::{ConversationHistory, DialogState, HISTORY_LIMIT, UserContext};
pub use error::StoreError;
pub use message::{Message, MessageRole};
pub use name::{extract_name, introduces_self};
pub use store::{ContextStore, InMemoryContextStore, TurnLocks};
