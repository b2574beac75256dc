//! pagechat webhook server.
//!
//! Receives Facebook Messenger webhook deliveries, produces a reply for
//! each messaging event, and posts it back through the Send API.

pub mod app;
pub mod config;
pub mod error;
pub mod webhook;
