// Error types shared by the store, the services and the API layer

use std::time::Duration;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type alias for domain operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling a request
#[derive(Debug, Error)]
pub enum Error {
    /// One or more request fields violate their rules
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Referenced agent does not exist
    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    /// Referenced chat session does not exist
    #[error("Chat session not found: {0}")]
    SessionNotFound(String),

    /// Caller exceeded its request budget for the current window
    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl Error {
    /// Create an agent not found error
    pub fn agent_not_found(agent_id: impl Into<String>) -> Self {
        Error::AgentNotFound(agent_id.into())
    }

    /// Create a session not found error
    pub fn session_not_found(session_id: impl Into<String>) -> Self {
        Error::SessionNotFound(session_id.into())
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}
