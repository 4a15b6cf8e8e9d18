//! Plan ingestion error types

use thiserror::Error;

use crate::llm::LlmError;

/// Errors that can occur while generating a plan
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Failed to parse AI response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to build prompt: {0}")]
    Prompt(String),
}

/// Coarse classification of a [`PlanError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or placeholder credential, broken prompt template
    Configuration,
    /// Network failure or timeout
    Transport,
    /// Provider error payload, non-2xx status or empty choices
    RemoteApi,
    /// Reply was not valid plan JSON after fence stripping
    Decode,
}

impl PlanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlanError::Llm(e) if e.is_configuration() => ErrorKind::Configuration,
            PlanError::Llm(e) if e.is_transport() => ErrorKind::Transport,
            PlanError::Llm(_) => ErrorKind::RemoteApi,
            PlanError::Decode(_) => ErrorKind::Decode,
            PlanError::Prompt(_) => ErrorKind::Configuration,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Transport => write!(f, "transport"),
            Self::RemoteApi => write!(f, "remote-api"),
            Self::Decode => write!(f, "decode"),
        }
    }
}
