use std::collections::HashMap;

use crate::errors::{AgentError, AgentResult};
use crate::providers::factory::ProviderType;

use super::config::AgentConfig;

/// The set of agent configurations known to the process.
///
/// Registered once at startup, read concurrently afterwards; identifiers are
/// unique by construction because duplicate registration is rejected.
pub struct AgentRegistry {
    agents: HashMap<String, AgentConfig>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            agents: HashMap::new(),
        }
    }

    pub fn register(&mut self, config: AgentConfig) -> AgentResult<()> {
        config.validate()?;
        if self.agents.contains_key(&config.id) {
            return Err(AgentError::Validation(format!(
                "agent already registered: {}",
                config.id
            )));
        }
        self.agents.insert(config.id.clone(), config);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&AgentConfig> {
        self.agents.get(id)
    }

    /// All registered configurations, ordered by identifier.
    pub fn list(&self) -> Vec<&AgentConfig> {
        let mut configs: Vec<&AgentConfig> = self.agents.values().collect();
        configs.sort_by(|a, b| a.id.cmp(&b.id));
        configs
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The agents shipped with the service.
pub fn default_agents() -> AgentResult<AgentRegistry> {
    let mut registry = AgentRegistry::new();

    registry.register(
        AgentConfig::new(
            "assistant",
            "General Assistant",
            "You are a helpful AI assistant. You are friendly, concise, and accurate.\n\
             You help users with a variety of tasks including answering questions, writing, analysis, and more.\n\
             When you don't know something, you say so honestly.",
            ProviderType::Anthropic,
            "claude-3-5-sonnet-20241022",
        )
        .with_description("A helpful AI assistant")
        .with_tools(&["calculator", "current_time"]),
    )?;

    registry.register(
        AgentConfig::new(
            "coder",
            "Code Assistant",
            "You are an expert software engineer. You write clean, maintainable code.\n\
             You follow best practices and explain your reasoning. You consider edge cases and error handling.",
            ProviderType::Anthropic,
            "claude-3-5-sonnet-20241022",
        )
        .with_description("Specialized in coding tasks")
        .with_temperature(0.2),
    )?;

    Ok(registry)
}
