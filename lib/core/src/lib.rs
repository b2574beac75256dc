//! Core domain types and utilities for pagechat.
//!
//! This crate provides the foundational types and error handling shared by
//! the conversation, AI, responder, and Messenger crates.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{DeliveryId, ParseIdError, SenderId};
