use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/health/detailed", get(detailed))
        .with_state(state)
}

/// Root endpoint with service info.
async fn root() -> Json<Value> {
    Json(json!({
        "service": "magpie",
        "version": VERSION,
        "status": "running",
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": VERSION,
        "uptimeSeconds": state.started_at.elapsed().as_secs_f64(),
    }))
}

async fn liveness() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Readiness reports a warning rather than failing when no provider has
/// credentials; the service can still serve agent and tool listings.
async fn readiness(State(state): State<AppState>) -> Json<Value> {
    let provider_check = if state.settings.providers.any_configured() {
        json!({"status": "ok"})
    } else {
        json!({"status": "warning", "message": "No AI provider configured"})
    };

    Json(json!({
        "status": "ok",
        "checks": {
            "aiProvider": provider_check,
        }
    }))
}

async fn detailed(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": VERSION,
        "uptimeSeconds": state.started_at.elapsed().as_secs_f64(),
        "checks": {
            "openai": {"configured": state.settings.providers.openai.is_some()},
            "anthropic": {"configured": state.settings.providers.anthropic.is_some()},
            "agents": {"registered": state.agents.len()},
            "capabilities": {"registered": state.capabilities.len()},
        }
    }))
}
