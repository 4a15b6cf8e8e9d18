//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key is not configured. Set the {env_var} environment variable.")]
    MissingApiKey { env_var: String },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("No response choices returned by the LLM API")]
    EmptyChoices,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

impl LlmError {
    /// The call never left the process because of local configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, LlmError::MissingApiKey { .. })
    }

    /// The request did not complete at the transport level
    pub fn is_transport(&self) -> bool {
        matches!(self, LlmError::Network(_) | LlmError::Timeout(_))
    }
}
