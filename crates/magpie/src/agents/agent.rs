use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::capabilities::CapabilityRegistry;
use crate::errors::AgentError;
use crate::models::message::Message;
use crate::models::tool::{Tool, ToolCall, ToolResult};
use crate::providers::base::{CompletionOptions, Provider};

use super::config::AgentConfig;

/// Advisory content returned when the iteration cap is exhausted.
const MAX_ITERATIONS_MESSAGE: &str =
    "I've reached the maximum number of steps. Please try again with a simpler request.";

/// The outcome of one loop invocation: the final assistant message plus
/// every tool outcome accumulated along the way, in dispatch order.
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub message: Message,
    pub tool_results: Vec<ToolResult>,
}

/// A failed loop invocation. Tool results accumulated before the failure are
/// carried alongside the error rather than discarded.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ReplyError {
    #[source]
    pub source: AgentError,
    pub tool_results: Vec<ToolResult>,
}

/// Agent drives the completion/dispatch loop for one configuration.
///
/// Each chat request runs one independent invocation; the only state shared
/// between invocations is the read-only capability registry.
pub struct Agent {
    config: AgentConfig,
    provider: Box<dyn Provider>,
    capabilities: Arc<CapabilityRegistry>,
    tools: Vec<Tool>,
}

impl Agent {
    /// Create an agent for the given configuration.
    ///
    /// The exposed tool schemas are resolved here, once; configured names
    /// missing from the registry are dropped.
    pub fn new(
        config: AgentConfig,
        provider: Box<dyn Provider>,
        capabilities: Arc<CapabilityRegistry>,
    ) -> Self {
        let tools = capabilities.schemas_for(&config.tools);
        Self {
            config,
            provider,
            capabilities,
            tools,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// The tool schemas this agent exposes to its provider.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Drive the conversation until the model produces a final answer or the
    /// iteration cap is hit.
    ///
    /// Tool calls within one assistant turn are dispatched sequentially in
    /// the order the backend returned them, and their results are
    /// interleaved into the conversation in that same order, so the next
    /// completion always sees a deterministic history.
    pub async fn reply(&self, conversation: Vec<Message>) -> Result<AgentReply, ReplyError> {
        let mut messages = conversation;
        let mut tool_results: Vec<ToolResult> = Vec::new();
        let options = CompletionOptions {
            temperature: Some(self.config.temperature),
            max_tokens: self.config.max_tokens,
        };

        for iteration in 1..=self.config.max_iterations {
            debug!(agent_id = %self.config.id, iteration, "requesting completion");

            let response = match self
                .provider
                .complete(&self.config.system_prompt, &messages, &self.tools, &options)
                .await
            {
                Ok(response) => response,
                Err(source) => {
                    return Err(ReplyError {
                        source,
                        tool_results,
                    })
                }
            };

            if !response.has_tool_calls() {
                info!(agent_id = %self.config.id, iteration, "completion finished");
                return Ok(AgentReply {
                    message: response,
                    tool_results,
                });
            }

            let tool_calls = response.tool_calls.clone().unwrap_or_default();
            messages.push(response);

            for call in &tool_calls {
                let result = self.dispatch(call).await;
                messages.push(Message::tool(call.id.clone(), result.render()));
                tool_results.push(result);
            }
        }

        warn!(
            agent_id = %self.config.id,
            max_iterations = self.config.max_iterations,
            "max iterations reached"
        );
        Ok(AgentReply {
            message: Message::assistant(MAX_ITERATIONS_MESSAGE),
            tool_results,
        })
    }

    /// Execute a single tool call. Failures never escape: unknown or
    /// disallowed names and execution errors all become error results, so
    /// one bad call cannot abort the rest of the batch. The model reads the
    /// error text on its next turn and may retry with different arguments.
    async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        // The allowed-tool check lives here, not in the registry: the
        // registry stays unaware of per-agent restrictions.
        let allowed = self.config.tools.iter().any(|name| name == &call.name);
        let capability = if allowed {
            self.capabilities.lookup(&call.name)
        } else {
            None
        };
        let Some(capability) = capability else {
            let error = AgentError::ToolNotFound(call.name.clone());
            return ToolResult::error(&call.id, error.to_string());
        };

        debug!(agent_id = %self.config.id, tool = %call.name, "executing tool");
        match capability.call(call.arguments.clone()).await {
            Ok(Value::Null) => ToolResult::empty(&call.id),
            Ok(value) => ToolResult::success(&call.id, value),
            Err(error) => {
                warn!(agent_id = %self.config.id, tool = %call.name, %error, "tool execution failed");
                ToolResult::error(&call.id, error.to_string())
            }
        }
    }
}
