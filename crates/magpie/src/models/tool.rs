use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool that can be exposed to a model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// JSON schema describing the arguments the tool accepts
    pub input_schema: Value,
}

impl Tool {
    /// Create a new tool with the given name and description
    pub fn new<N, D>(name: N, description: D, input_schema: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Tool {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// A tool invocation requested by an assistant message.
///
/// Produced only by provider adapters when parsing a completion; consumed
/// only by the agent loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// Identifier unique within the message that produced this call
    pub id: String,
    /// The name of the tool to execute
    pub name: String,
    /// Arguments as a JSON object with string keys
    pub arguments: Value,
}

impl ToolCall {
    pub fn new<I, N>(id: I, name: N, arguments: Value) -> Self
    where
        I: Into<String>,
        N: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Outcome of dispatching a single tool call.
///
/// At most one of `value` and `error` is set; both absent is a valid
/// "no output" result. The constructors are the only sanctioned way to
/// build one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    /// Identifier of the tool call this result answers
    pub tool_call_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(tool_call_id: impl Into<String>, value: Value) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            value: Some(value),
            error: None,
        }
    }

    /// A successful execution that produced no representable output.
    pub fn empty(tool_call_id: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            value: None,
            error: None,
        }
    }

    pub fn error(tool_call_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            value: None,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The textual form appended to the conversation as a tool message.
    ///
    /// String values are rendered verbatim so the model is not shown JSON
    /// quoting; other values render as compact JSON.
    pub fn render(&self) -> String {
        if let Some(error) = &self.error {
            return error.clone();
        }
        match &self.value {
            Some(Value::String(text)) => text.clone(),
            Some(value) => value.to_string(),
            None => String::new(),
        }
    }
}
