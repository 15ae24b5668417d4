use regex::Regex;
use serde_json::{json, Value};

use crate::errors::{AgentError, AgentResult};
use crate::models::message::{Message, MessageMetadata};
use crate::models::tool::{Tool, ToolCall};

/// Convert internal messages to OpenAI's chat message specification.
pub fn messages_to_openai_spec(messages: &[Message]) -> Vec<Value> {
    let mut messages_spec = Vec::new();

    for message in messages {
        let mut converted = json!({
            "role": message.role,
            "content": message.content,
        });

        if let Some(tool_calls) = &message.tool_calls {
            let calls: Vec<Value> = tool_calls
                .iter()
                .map(|call| {
                    json!({
                        "id": call.id,
                        "type": "function",
                        "function": {
                            "name": call.name,
                            // OpenAI transports arguments as a JSON string
                            "arguments": call.arguments.to_string(),
                        }
                    })
                })
                .collect();
            converted["tool_calls"] = json!(calls);
        }

        if let Some(tool_call_id) = &message.tool_call_id {
            converted["tool_call_id"] = json!(tool_call_id);
        }

        messages_spec.push(converted);
    }

    messages_spec
}

/// Convert tool schema descriptors to OpenAI's function-tool specification.
pub fn tools_to_openai_spec(tools: &[Tool]) -> AgentResult<Vec<Value>> {
    let mut tool_names = std::collections::HashSet::new();
    let mut result = Vec::new();

    for tool in tools {
        if !tool_names.insert(&tool.name) {
            return Err(AgentError::Validation(format!(
                "Duplicate tool name: {}",
                tool.name
            )));
        }

        result.push(json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": tool.input_schema,
            }
        }));
    }

    Ok(result)
}

/// Convert an OpenAI chat completion response into the shared message shape.
///
/// Tool-call arguments arrive as a stringified JSON object; a payload that
/// does not decode to an object is a provider error, never an empty mapping.
pub fn openai_response_to_message(response: &Value, model: &str) -> AgentResult<Message> {
    let original = &response["choices"][0]["message"];
    if original.is_null() {
        return Err(AgentError::provider("openai", "response carried no choices"));
    }

    let content = original
        .get("content")
        .and_then(|c| c.as_str())
        .unwrap_or_default()
        .to_string();

    let mut tool_calls = Vec::new();
    if let Some(requested) = original.get("tool_calls").and_then(|t| t.as_array()) {
        for call in requested {
            let id = call["id"].as_str().unwrap_or_default().to_string();
            let name = call["function"]["name"]
                .as_str()
                .unwrap_or_default()
                .to_string();

            if !is_valid_function_name(&name) {
                return Err(AgentError::provider(
                    "openai",
                    format!(
                        "invalid function name '{name}', it must match [a-zA-Z0-9_-]+"
                    ),
                ));
            }

            let raw_arguments = call["function"]["arguments"].as_str().unwrap_or_default();
            let arguments: Value = serde_json::from_str(raw_arguments).map_err(|e| {
                AgentError::provider(
                    "openai",
                    format!("could not decode tool call arguments for id {id}: {e}"),
                )
            })?;
            if !arguments.is_object() {
                return Err(AgentError::provider(
                    "openai",
                    format!("tool call arguments for id {id} are not an object"),
                ));
            }

            tool_calls.push(ToolCall::new(id, name, arguments));
        }
    }

    let message = Message::assistant(content).with_metadata(openai_usage(response, model));
    if tool_calls.is_empty() {
        Ok(message)
    } else {
        message
            .with_tool_calls(tool_calls)
            .map_err(|e| AgentError::provider("openai", e))
    }
}

/// Token accounting as reported by OpenAI-shaped responses.
pub fn openai_usage(response: &Value, model: &str) -> MessageMetadata {
    let usage = response.get("usage");

    let input_tokens = usage
        .and_then(|u| u.get("prompt_tokens"))
        .and_then(|v| v.as_i64())
        .map(|v| v as i32);

    let output_tokens = usage
        .and_then(|u| u.get("completion_tokens"))
        .and_then(|v| v.as_i64())
        .map(|v| v as i32);

    MessageMetadata {
        model: Some(model.to_string()),
        input_tokens,
        output_tokens,
    }
}

fn is_valid_function_name(name: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
    re.is_match(name)
}
