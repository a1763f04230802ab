//! Completion client error types

use thiserror::Error;

/// Errors that can occur while requesting a completion
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Network, DNS, TLS or connection failure reaching the provider
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("API error: {message}")]
    Upstream { status: u16, message: String },

    /// Provider answered 2xx but the body lacks a completion
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl CompletionError {
    /// HTTP status reported by the provider, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            CompletionError::Upstream { status, .. } => Some(*status),
            CompletionError::Transport(e) => e.status().map(|s| s.as_u16()),
            CompletionError::Malformed(_) => None,
        }
    }
}
