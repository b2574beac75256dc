//! Error types for the conversation crate.

use std::fmt;

/// Errors from context store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached.
    Unavailable { reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "context store unavailable: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}
