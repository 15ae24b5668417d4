use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use super::envelope::ApiResponse;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/agents", get(list_agents))
        .route("/agents/tools/all", get(list_all_tools))
        .route("/agents/:id", get(agent_info))
        .route("/agents/:id/tools", get(agent_tools))
        .with_state(state)
}

/// List all available agents.
async fn list_agents(State(state): State<AppState>) -> Json<ApiResponse> {
    let agents: Vec<Value> = state
        .agents
        .list()
        .iter()
        .map(|config| {
            json!({
                "id": config.id,
                "name": config.name,
                "description": config.description,
                "tools": config.tools,
            })
        })
        .collect();

    Json(ApiResponse::success(json!(agents)))
}

/// Get details about a specific agent.
async fn agent_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    let Some(config) = state.agents.get(&id) else {
        return not_found(&id);
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({
            "id": config.id,
            "name": config.name,
            "description": config.description,
            "tools": config.tools,
            "isActive": true,
        }))),
    )
}

/// The tool schemas one agent exposes to its provider.
async fn agent_tools(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    let Some(config) = state.agents.get(&id) else {
        return not_found(&id);
    };

    let tools = state.capabilities.schemas_for(&config.tools);
    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({
            "agentId": id,
            "tools": tools,
        }))),
    )
}

/// Every registered capability schema, regardless of agent.
async fn list_all_tools(State(state): State<AppState>) -> Json<ApiResponse> {
    Json(ApiResponse::success(json!(state.capabilities.definitions())))
}

fn not_found(id: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error(
            "AGENT_NOT_FOUND",
            format!("Agent not found: {id}"),
        )),
    )
}
