use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::role::Role;
use super::tool::ToolCall;
use crate::errors::{AgentError, AgentResult};

/// Metadata attached to a completion: which model produced it and what it
/// cost in tokens, as far as the backend reported either.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<i32>,
}

impl MessageMetadata {
    pub fn new(
        model: impl Into<String>,
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
    ) -> Self {
        Self {
            model: Some(model.into()),
            input_tokens,
            output_tokens,
        }
    }
}

/// A message to or from an LLM.
///
/// Messages are immutable once constructed; a conversation is an append-only
/// sequence of them, owned by exactly one in-flight loop invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub created: i64,
    /// Identifier of the tool call this message answers; set iff role is tool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Tool invocations requested by an assistant message, in call order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl Message {
    fn new<S: Into<String>>(role: Role, content: S) -> Self {
        Message {
            role,
            content: content.into(),
            created: Utc::now().timestamp(),
            tool_call_id: None,
            tool_calls: None,
            metadata: None,
        }
    }

    /// Create a new user message with the current timestamp
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant message with the current timestamp
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a new system message with the current timestamp
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a tool message answering the tool call with the given
    /// identifier. The identifier is required up front so a tool message
    /// without one cannot be constructed.
    pub fn tool<I: Into<String>, S: Into<String>>(tool_call_id: I, content: S) -> Self {
        let mut message = Self::new(Role::Tool, content);
        message.tool_call_id = Some(tool_call_id.into());
        message
    }

    /// Attach the tool calls requested by an assistant message.
    ///
    /// The list must be non-empty and every call needs a non-empty
    /// identifier unique within this message.
    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCall>) -> AgentResult<Self> {
        if self.role != Role::Assistant {
            return Err(AgentError::Validation(
                "only assistant messages can carry tool calls".to_string(),
            ));
        }
        if tool_calls.is_empty() {
            return Err(AgentError::Validation(
                "tool call list must not be empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for call in &tool_calls {
            if call.id.is_empty() {
                return Err(AgentError::Validation(format!(
                    "tool call '{}' is missing an identifier",
                    call.name
                )));
            }
            if !seen.insert(call.id.as_str()) {
                return Err(AgentError::Validation(format!(
                    "duplicate tool call identifier '{}'",
                    call.id
                )));
            }
        }
        self.tool_calls = Some(tool_calls);
        Ok(self)
    }

    /// Attach completion metadata to the message
    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_message_carries_call_id() {
        let message = Message::tool("call_1", "4");
        assert_eq!(message.role, Role::Tool);
        assert_eq!(message.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(message.content, "4");
    }

    #[test]
    fn test_with_tool_calls_rejects_empty_list() {
        let result = Message::assistant("").with_tool_calls(vec![]);
        assert!(matches!(result, Err(AgentError::Validation(_))));
    }

    #[test]
    fn test_with_tool_calls_rejects_duplicate_ids() {
        let result = Message::assistant("").with_tool_calls(vec![
            ToolCall::new("1", "calculator", json!({})),
            ToolCall::new("1", "current_time", json!({})),
        ]);
        assert!(matches!(result, Err(AgentError::Validation(_))));
    }

    #[test]
    fn test_with_tool_calls_rejects_missing_id() {
        let result = Message::assistant("")
            .with_tool_calls(vec![ToolCall::new("", "calculator", json!({}))]);
        assert!(matches!(result, Err(AgentError::Validation(_))));
    }

    #[test]
    fn test_with_tool_calls_rejects_non_assistant_roles() {
        let result =
            Message::user("hi").with_tool_calls(vec![ToolCall::new("1", "calculator", json!({}))]);
        assert!(matches!(result, Err(AgentError::Validation(_))));
    }

    #[test]
    fn test_has_tool_calls() {
        let plain = Message::assistant("done");
        assert!(!plain.has_tool_calls());

        let calling = Message::assistant("")
            .with_tool_calls(vec![ToolCall::new("1", "calculator", json!({}))])
            .unwrap();
        assert!(calling.has_tool_calls());
    }

    #[test]
    fn test_serialization_uses_camel_case_and_lowercase_roles() {
        let message = Message::tool("call_1", "4");
        let serialized = serde_json::to_value(&message).unwrap();
        assert_eq!(serialized["role"], "tool");
        assert_eq!(serialized["toolCallId"], "call_1");
        assert!(serialized.get("toolCalls").is_none());
        assert!(serialized.get("metadata").is_none());
    }

    #[test]
    fn test_metadata_roundtrip() {
        let message = Message::assistant("hello")
            .with_metadata(MessageMetadata::new("gpt-4o", Some(12), Some(3)));
        let serialized = serde_json::to_string(&message).unwrap();
        let deserialized: Message = serde_json::from_str(&serialized).unwrap();
        assert_eq!(message, deserialized);
        assert_eq!(
            deserialized.metadata.unwrap().input_tokens,
            Some(12)
        );
    }
}
