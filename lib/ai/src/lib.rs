//! Language-model primitives for pagechat.
//!
//! This crate provides:
//!
//! - **Backend**: the [`LlmBackend`] trait and chat request/response types
//! - **OpenAI**: a chat-completion backend for OpenAI-compatible endpoints
//! - **Prompt**: assembly of the persona prompt around a sender's history

pub mod backend;
pub mod error;
pub mod openai;
pub mod prompt;

pub use backend::{ChatRequest, ChatResponse, LlmBackend, TokenUsage};
pub use error::LlmError;
pub use openai::{OpenAiBackend, OpenAiConfig};
pub use prompt::{ConversationPrompt, DEFAULT_PERSONA, postback_prompt};
