use anyhow::Result;
use tracing::{info, warn};

use magpie::agents::registry::default_agents;
use magpie::capabilities::default_registry;
use magpie_server::configuration::Settings;
use magpie_server::routes;
use magpie_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let settings = Settings::new()?;
    if !settings.providers.any_configured() {
        warn!("no provider credentials configured; chat requests will fail until one is set");
    }

    let capabilities = default_registry()?;
    let agents = default_agents()?;
    info!(
        agents = agents.len(),
        capabilities = capabilities.len(),
        "registries initialized"
    );

    let addr = settings.server.socket_addr();
    let state = AppState::new(settings, agents, capabilities);
    let app = routes::configure(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("shutting down");

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
