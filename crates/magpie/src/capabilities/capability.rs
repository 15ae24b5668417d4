use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AgentResult;
use crate::models::tool::Tool;

/// Core trait for a named, schema-described executable unit that a model may
/// request invocation of.
///
/// Capabilities are stateless and registered once at process start; they may
/// be invoked concurrently by any number of agent loops.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Get the name of the capability
    fn name(&self) -> &str;

    /// Get the capability description, shown to the model
    fn description(&self) -> &str;

    /// JSON schema describing the arguments this capability accepts
    fn input_schema(&self) -> Value;

    /// Execute with the given arguments
    async fn call(&self, arguments: Value) -> AgentResult<Value>;

    /// The schema descriptor advertised to providers
    fn definition(&self) -> Tool {
        Tool::new(self.name(), self.description(), self.input_schema())
    }
}
