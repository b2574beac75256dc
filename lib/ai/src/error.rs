//! Error types for the AI crate.

use std::fmt;

/// Errors from LLM backend operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// No API credential is configured for the backend.
    MissingCredential { provider: String },
    /// The request could not be sent or the connection failed.
    RequestFailed { reason: String },
    /// The provider answered with a non-success status.
    Rejected { status: u16, body: String },
    /// Response parsing failed.
    ResponseParseFailed { reason: String },
    /// The response contained no usable completion.
    EmptyCompletion,
    /// Timeout waiting for response.
    Timeout,
    /// Rate limit exceeded.
    RateLimited { retry_after_secs: Option<u64> },
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential { provider } => {
                write!(f, "no API key configured for LLM provider '{provider}'")
            }
            Self::RequestFailed { reason } => {
                write!(f, "LLM request failed: {reason}")
            }
            Self::Rejected { status, body } => {
                write!(f, "LLM provider rejected request with status {status}: {body}")
            }
            Self::ResponseParseFailed { reason } => {
                write!(f, "failed to parse LLM response: {reason}")
            }
            Self::EmptyCompletion => write!(f, "LLM response contained no completion"),
            Self::Timeout => write!(f, "LLM request timed out"),
            Self::RateLimited { retry_after_secs } => {
                if let Some(secs) = retry_after_secs {
                    write!(f, "rate limited, retry after {secs}s")
                } else {
                    write!(f, "rate limited")
                }
            }
        }
    }
}

impl std::error::Error for LlmError {}
