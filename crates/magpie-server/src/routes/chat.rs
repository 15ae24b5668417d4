use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use magpie::agents::agent::Agent;
use magpie::errors::AgentError;
use magpie::models::message::Message;
use magpie::providers::factory;

use super::envelope::ApiResponse;
use crate::state::AppState;

const MAX_MESSAGE_CHARS: usize = 32_000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
    message: String,
    #[serde(default = "default_agent_id")]
    agent_id: String,
    #[serde(default)]
    conversation_id: Option<String>,
}

fn default_agent_id() -> String {
    "assistant".to_string()
}

pub fn routes(state: AppState) -> Router {
    Router::new().route("/chat", post(chat)).with_state(state)
}

/// Send a message to an agent and run its loop to completion.
///
/// Tool failures are not surfaced here; they only appear inside the
/// toolResults list, where the model already saw and reacted to them.
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let ChatRequest {
        message,
        agent_id,
        conversation_id,
    } = request;

    if message.is_empty() || message.chars().count() > MAX_MESSAGE_CHARS {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(
                "INVALID_REQUEST",
                format!("message must be between 1 and {MAX_MESSAGE_CHARS} characters"),
            )),
        );
    }

    // Unknown agents are rejected before any loop is constructed
    let Some(config) = state.agents.get(&agent_id) else {
        let error = AgentError::UnknownAgent(agent_id);
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("AGENT_NOT_FOUND", error.to_string())),
        );
    };

    let provider_config = match state.settings.provider_config_for(config) {
        Ok(provider_config) => provider_config,
        Err(cause) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("PROVIDER_NOT_CONFIGURED", cause.to_string())),
            );
        }
    };
    let provider = match factory::get_provider(provider_config) {
        Ok(provider) => provider,
        Err(cause) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("PROVIDER_ERROR", cause.to_string())),
            );
        }
    };

    let agent = Agent::new(config.clone(), provider, state.capabilities.clone());
    let conversation = vec![Message::user(message)];

    match agent.reply(conversation).await {
        Ok(reply) => {
            let conversation_id =
                conversation_id.unwrap_or_else(|| Uuid::new_v4().to_string());
            (
                StatusCode::OK,
                Json(ApiResponse::success(json!({
                    "conversationId": conversation_id,
                    "message": reply.message,
                    "toolResults": reply.tool_results,
                }))),
            )
        }
        Err(failure) => {
            error!(%agent_id, error = %failure, "chat failed");
            // Tool results accumulated before the failure ride along in the
            // error details instead of being discarded
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(
                    ApiResponse::error("PROVIDER_ERROR", failure.to_string())
                        .with_details(json!({"toolResults": failure.tool_results})),
                ),
            )
        }
    }
}
