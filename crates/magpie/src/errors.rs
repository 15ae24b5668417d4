use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Invalid construction: {0}")]
    Validation(String),

    #[error("Provider {provider} request failed: {message}")]
    Provider { provider: String, message: String },

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Tool execution failed: {0}")]
    ExecutionError(String),

    #[error("Agent not found: {0}")]
    UnknownAgent(String),

    #[error("Capability already registered: {0}")]
    DuplicateCapability(String),
}

impl AgentError {
    /// A provider failure carrying the backend name and the underlying cause.
    pub fn provider(provider: impl Into<String>, cause: impl ToString) -> Self {
        AgentError::Provider {
            provider: provider.into(),
            message: cause.to_string(),
        }
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
