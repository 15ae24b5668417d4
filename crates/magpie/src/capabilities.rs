pub mod calculator;
pub mod clock;
pub mod json_query;

mod capability;
mod registry;

pub use capability::Capability;
pub use registry::CapabilityRegistry;

use std::sync::Arc;

use crate::errors::AgentResult;

/// Build the registry of built-in capabilities.
///
/// Called once at process start; the returned registry is then shared
/// read-only across loop invocations.
pub fn default_registry() -> AgentResult<CapabilityRegistry> {
    let mut registry = CapabilityRegistry::new();
    registry.register(Arc::new(calculator::Calculator))?;
    registry.register(Arc::new(clock::CurrentTime))?;
    registry.register(Arc::new(json_query::JsonParse))?;
    Ok(registry)
}
