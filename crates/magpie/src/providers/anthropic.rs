use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};

use super::base::{CompletionOptions, Provider};
use super::configs::AnthropicProviderConfig;
use crate::errors::{AgentError, AgentResult};
use crate::models::message::{Message, MessageMetadata};
use crate::models::role::Role;
use crate::models::tool::{Tool, ToolCall};

const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Anthropic requires an explicit generation cap on every request
const DEFAULT_MAX_TOKENS: i32 = 4096;

pub struct AnthropicProvider {
    client: Client,
    config: AnthropicProviderConfig,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicProviderConfig) -> AgentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()
            .map_err(|e| AgentError::provider("anthropic", e))?;

        Ok(Self { client, config })
    }

    /// Convert internal messages into Anthropic turn structure.
    ///
    /// Assistant tool calls become `tool_use` content blocks; tool messages
    /// ride back as user-role `tool_result` blocks. The system prompt never
    /// appears here, it travels as a top-level request field.
    fn messages_to_anthropic_spec(messages: &[Message]) -> Vec<Value> {
        let mut anthropic_messages = Vec::new();

        for message in messages {
            match message.role {
                Role::System => continue,
                Role::User => {
                    anthropic_messages.push(json!({
                        "role": "user",
                        "content": message.content
                    }));
                }
                Role::Assistant => {
                    let mut blocks = Vec::new();
                    if !message.content.is_empty() {
                        blocks.push(json!({"type": "text", "text": message.content}));
                    }
                    if let Some(tool_calls) = &message.tool_calls {
                        for call in tool_calls {
                            blocks.push(json!({
                                "type": "tool_use",
                                "id": call.id,
                                "name": call.name,
                                "input": call.arguments
                            }));
                        }
                    }
                    if blocks.is_empty() {
                        blocks.push(json!({"type": "text", "text": ""}));
                    }
                    anthropic_messages.push(json!({
                        "role": "assistant",
                        "content": blocks
                    }));
                }
                Role::Tool => {
                    let tool_use_id = message.tool_call_id.clone().unwrap_or_default();
                    anthropic_messages.push(json!({
                        "role": "user",
                        "content": [{
                            "type": "tool_result",
                            "tool_use_id": tool_use_id,
                            "content": message.content
                        }]
                    }));
                }
            }
        }

        anthropic_messages
    }

    fn tools_to_anthropic_spec(tools: &[Tool]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "input_schema": tool.input_schema
                })
            })
            .collect()
    }

    /// Normalize the content-block response shape into one assistant message.
    fn response_to_message(&self, response: &Value) -> AgentResult<Message> {
        let blocks = response
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                AgentError::provider("anthropic", "response carried no content blocks")
            })?;

        let mut content = String::new();
        let mut tool_calls = Vec::new();

        for block in blocks {
            match block.get("type").and_then(|t| t.as_str()) {
                Some("text") => {
                    content.push_str(block.get("text").and_then(|t| t.as_str()).unwrap_or_default());
                }
                Some("tool_use") => {
                    let id = block
                        .get("id")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string();
                    let name = block
                        .get("name")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string();
                    // tool_use input is native JSON and must already be an object
                    let input = block.get("input").cloned().unwrap_or(Value::Null);
                    if !input.is_object() {
                        return Err(AgentError::provider(
                            "anthropic",
                            format!("tool call arguments for id {id} are not an object"),
                        ));
                    }
                    tool_calls.push(ToolCall::new(id, name, input));
                }
                _ => {}
            }
        }

        let usage = response.get("usage");
        let metadata = MessageMetadata {
            model: Some(self.config.model.clone()),
            input_tokens: usage
                .and_then(|u| u.get("input_tokens"))
                .and_then(|v| v.as_i64())
                .map(|v| v as i32),
            output_tokens: usage
                .and_then(|u| u.get("output_tokens"))
                .and_then(|v| v.as_i64())
                .map(|v| v as i32),
        };

        let message = Message::assistant(content).with_metadata(metadata);
        if tool_calls.is_empty() {
            Ok(message)
        } else {
            message
                .with_tool_calls(tool_calls)
                .map_err(|e| AgentError::provider("anthropic", e))
        }
    }

    async fn post(&self, payload: Value) -> AgentResult<Value> {
        let url = format!("{}/v1/messages", self.config.host.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AgentError::provider("anthropic", e))?;

        match response.status() {
            StatusCode::OK => response
                .json()
                .await
                .map_err(|e| AgentError::provider("anthropic", e)),
            status if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() >= 500 => {
                Err(AgentError::provider(
                    "anthropic",
                    format!("server error: {status}"),
                ))
            }
            status => Err(AgentError::provider(
                "anthropic",
                format!("request failed: {status}"),
            )),
        }
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[Tool],
        options: &CompletionOptions,
    ) -> AgentResult<Message> {
        let anthropic_messages = Self::messages_to_anthropic_spec(messages);

        let mut payload = json!({
            "model": self.config.model,
            "system": system,
            "messages": anthropic_messages,
            "max_tokens": options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
        });

        if !tools.is_empty() {
            payload.as_object_mut().unwrap().insert(
                "tools".to_string(),
                json!(Self::tools_to_anthropic_spec(tools)),
            );
        }
        if let Some(temp) = options.temperature {
            payload
                .as_object_mut()
                .unwrap()
                .insert("temperature".to_string(), json!(temp));
        }

        let response = self.post(payload).await?;

        if let Some(error) = response.get("error") {
            return Err(AgentError::provider(
                "anthropic",
                format!("API error: {error}"),
            ));
        }

        self.response_to_message(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup_mock_server(response_body: Value) -> (MockServer, AnthropicProvider) {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test_api_key"))
            .and(header("anthropic-version", ANTHROPIC_API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
            .mount(&mock_server)
            .await;

        let config = AnthropicProviderConfig {
            host: mock_server.uri(),
            api_key: "test_api_key".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
        };

        let provider = AnthropicProvider::new(config).unwrap();
        (mock_server, provider)
    }

    #[tokio::test]
    async fn test_complete_basic() {
        let response_body = json!({
            "id": "msg_123",
            "type": "message",
            "role": "assistant",
            "content": [{
                "type": "text",
                "text": "Hello! How can I assist you today?"
            }],
            "model": "claude-3-5-sonnet-20241022",
            "stop_reason": "end_turn",
            "usage": {
                "input_tokens": 12,
                "output_tokens": 15
            }
        });

        let (_, provider) = setup_mock_server(response_body).await;

        let messages = vec![Message::user("Hello?")];
        let message = provider
            .complete(
                "You are a helpful assistant.",
                &messages,
                &[],
                &CompletionOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(message.content, "Hello! How can I assist you today?");
        assert!(!message.has_tool_calls());

        let metadata = message.metadata.unwrap();
        assert_eq!(metadata.input_tokens, Some(12));
        assert_eq!(metadata.output_tokens, Some(15));
    }

    #[tokio::test]
    async fn test_complete_tool_use() {
        let response_body = json!({
            "id": "msg_tool",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Let me calculate that."},
                {
                    "type": "tool_use",
                    "id": "toolu_1",
                    "name": "calculator",
                    "input": {"expression": "2+2"}
                }
            ],
            "model": "claude-3-5-sonnet-20241022",
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 20, "output_tokens": 9}
        });

        let (_, provider) = setup_mock_server(response_body).await;

        let tool = Tool::new(
            "calculator",
            "Evaluates arithmetic",
            json!({
                "type": "object",
                "properties": {"expression": {"type": "string"}},
                "required": ["expression"]
            }),
        );

        let message = provider
            .complete(
                "You are a helpful assistant.",
                &[Message::user("what is 2+2")],
                &[tool],
                &CompletionOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(message.content, "Let me calculate that.");
        let calls = message.tool_calls.unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "toolu_1");
        assert_eq!(calls[0].arguments, json!({"expression": "2+2"}));
    }

    #[tokio::test]
    async fn test_non_object_tool_input_is_a_provider_error() {
        let response_body = json!({
            "content": [{
                "type": "tool_use",
                "id": "toolu_1",
                "name": "calculator",
                "input": "2+2"
            }],
            "usage": {"input_tokens": 1, "output_tokens": 1}
        });

        let (_, provider) = setup_mock_server(response_body).await;

        let result = provider
            .complete(
                "system",
                &[Message::user("hi")],
                &[],
                &CompletionOptions::default(),
            )
            .await;
        assert!(matches!(
            result,
            Err(AgentError::Provider { provider, .. }) if provider == "anthropic"
        ));
    }

    #[test]
    fn test_messages_to_anthropic_spec_tool_cycle() {
        let assistant = Message::assistant("Let me check.")
            .with_tool_calls(vec![ToolCall::new(
                "toolu_1",
                "calculator",
                json!({"expression": "2+2"}),
            )])
            .unwrap();
        let messages = vec![
            Message::user("what is 2+2"),
            assistant,
            Message::tool("toolu_1", "4"),
        ];

        let spec = AnthropicProvider::messages_to_anthropic_spec(&messages);

        assert_eq!(spec.len(), 3);
        assert_eq!(spec[0]["role"], "user");
        assert_eq!(spec[1]["content"][0]["type"], "text");
        assert_eq!(spec[1]["content"][1]["type"], "tool_use");
        assert_eq!(spec[1]["content"][1]["input"], json!({"expression": "2+2"}));
        assert_eq!(spec[2]["role"], "user");
        assert_eq!(spec[2]["content"][0]["type"], "tool_result");
        assert_eq!(spec[2]["content"][0]["tool_use_id"], "toolu_1");
    }
}
