use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{AgentError, AgentResult};
use crate::models::tool::Tool;

use super::capability::Capability;

/// Registry mapping tool names to executable capabilities.
///
/// Written once at process start, then shared read-only across concurrent
/// loop invocations; no locking is needed because registration is confined
/// to initialization.
pub struct CapabilityRegistry {
    capabilities: HashMap<String, Arc<dyn Capability>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self {
            capabilities: HashMap::new(),
        }
    }

    /// Add a capability by name. A name collision is a startup failure, not
    /// a per-request condition.
    pub fn register(&mut self, capability: Arc<dyn Capability>) -> AgentResult<()> {
        let name = capability.name().to_string();
        if self.capabilities.contains_key(&name) {
            return Err(AgentError::DuplicateCapability(name));
        }
        self.capabilities.insert(name, capability);
        Ok(())
    }

    /// Look up a capability by name. Absence is a normal outcome the caller
    /// must handle.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.capabilities.get(name).cloned()
    }

    /// Schema descriptors for the given names, in the given order.
    ///
    /// Unknown names are skipped: a misconfigured agent loses that tool
    /// rather than failing construction.
    pub fn schemas_for(&self, names: &[String]) -> Vec<Tool> {
        names
            .iter()
            .filter_map(|name| self.lookup(name).map(|capability| capability.definition()))
            .collect()
    }

    /// Schema descriptors for every registered capability, ordered by name.
    pub fn definitions(&self) -> Vec<Tool> {
        let mut definitions: Vec<Tool> = self
            .capabilities
            .values()
            .map(|capability| capability.definition())
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct EchoCapability;

    #[async_trait]
    impl Capability for EchoCapability {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes back the input"
        }

        fn input_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": {"message": {"type": "string"}},
                "required": ["message"]
            })
        }

        async fn call(&self, arguments: Value) -> AgentResult<Value> {
            Ok(arguments["message"].clone())
        }
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Arc::new(EchoCapability)).unwrap();

        let result = registry.register(Arc::new(EchoCapability));
        assert!(matches!(
            result,
            Err(AgentError::DuplicateCapability(name)) if name == "echo"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Arc::new(EchoCapability)).unwrap();

        let first = registry.lookup("echo").unwrap();
        let second = registry.lookup("echo").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.lookup("missing").is_none());
    }

    #[test]
    fn test_schemas_for_skips_unknown_names() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Arc::new(EchoCapability)).unwrap();

        let schemas = registry.schemas_for(&[
            "missing".to_string(),
            "echo".to_string(),
            "also_missing".to_string(),
        ]);
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].name, "echo");
    }
}
