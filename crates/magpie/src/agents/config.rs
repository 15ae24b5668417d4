use serde::{Deserialize, Serialize};

use crate::errors::{AgentError, AgentResult};
use crate::providers::factory::ProviderType;

/// Default bound on completion requests within one loop invocation.
///
/// The cap exists because a model can keep requesting tools indefinitely;
/// bounding iterations bounds both latency and cost per request.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Fixed configuration for one agent.
///
/// Loaded once at process start and never mutated at request time; a loop
/// invocation borrows it read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub system_prompt: String,
    pub provider: ProviderType,
    pub model: String,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i32>,
    /// Names of the tools this agent may use
    pub tools: Vec<String>,
    pub max_iterations: usize,
}

impl AgentConfig {
    pub fn new<I, N, S, M>(id: I, name: N, system_prompt: S, provider: ProviderType, model: M) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        S: Into<String>,
        M: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            system_prompt: system_prompt.into(),
            provider,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            tools: Vec::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: i32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_tools(mut self, tools: &[&str]) -> Self {
        self.tools = tools.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Check the invariants that the builder cannot express structurally.
    pub fn validate(&self) -> AgentResult<()> {
        if self.id.trim().is_empty() {
            return Err(AgentError::Validation(
                "agent id must not be empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AgentError::Validation(format!(
                "temperature {} is outside [0, 2]",
                self.temperature
            )));
        }
        if self.max_iterations == 0 {
            return Err(AgentError::Validation(
                "max iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
