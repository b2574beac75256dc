//! Error types for the Messenger crate.

use std::fmt;

/// Errors from the Send API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// The HTTP client could not be built.
    ClientSetup { reason: String },
    /// The request never got a response.
    Transport { reason: String },
    /// The Graph API answered with a non-success status.
    Rejected { status: u16, body: String },
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientSetup { reason } => {
                write!(f, "failed to set up Send API client: {reason}")
            }
            Self::Transport { reason } => write!(f, "Send API request failed: {reason}"),
            Self::Rejected { status, body } => {
                write!(f, "Send API rejected message with status {status}: {body}")
            }
        }
    }
}

impl std::error::Error for SendError {}
