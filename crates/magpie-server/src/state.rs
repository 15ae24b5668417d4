use std::sync::Arc;
use std::time::Instant;

use magpie::agents::registry::AgentRegistry;
use magpie::capabilities::CapabilityRegistry;

use crate::configuration::Settings;

/// Shared application state.
///
/// The registries are written once at startup and read concurrently by
/// request handlers; each handler runs its own independent agent loop.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub agents: Arc<AgentRegistry>,
    pub capabilities: Arc<CapabilityRegistry>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        settings: Settings,
        agents: AgentRegistry,
        capabilities: CapabilityRegistry,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            agents: Arc::new(agents),
            capabilities: Arc::new(capabilities),
            started_at: Instant::now(),
        }
    }
}
