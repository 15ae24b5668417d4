use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::{AgentError, AgentResult};

use super::capability::Capability;

/// Parses a JSON string and optionally extracts the value at a dot-notation
/// path such as `data.items[0].name`.
pub struct JsonParse;

#[async_trait]
impl Capability for JsonParse {
    fn name(&self) -> &str {
        "json_parse"
    }

    fn description(&self) -> &str {
        "Parse a JSON string and optionally extract a specific path."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "json_string": {
                    "type": "string",
                    "description": "JSON string to parse"
                },
                "path": {
                    "type": "string",
                    "description": "Optional dot-notation path to extract (e.g., 'data.items[0].name')"
                }
            },
            "required": ["json_string"]
        })
    }

    async fn call(&self, arguments: Value) -> AgentResult<Value> {
        let raw = arguments
            .get("json_string")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                AgentError::ExecutionError("missing required argument: json_string".to_string())
            })?;

        let data: Value = serde_json::from_str(raw)
            .map_err(|e| AgentError::ExecutionError(format!("Invalid JSON: {e}")))?;

        match arguments.get("path").and_then(|v| v.as_str()) {
            Some(path) if !path.is_empty() => extract(&data, path),
            _ => Ok(data),
        }
    }
}

fn extract(data: &Value, path: &str) -> AgentResult<Value> {
    // `items[0]` and `items.0` address the same element
    let normalized = path.replace('[', ".").replace(']', "");
    let mut current = data;

    for part in normalized.split('.') {
        if part.is_empty() {
            continue;
        }
        current = match current {
            Value::Array(items) => {
                let index: usize = part.parse().map_err(|_| {
                    AgentError::ExecutionError(format!("Invalid array index '{part}'"))
                })?;
                items.get(index).ok_or_else(|| {
                    AgentError::ExecutionError(format!("Index {index} out of bounds"))
                })?
            }
            Value::Object(map) => map
                .get(part)
                .ok_or_else(|| AgentError::ExecutionError(format!("Unknown key '{part}'")))?,
            _ => {
                return Err(AgentError::ExecutionError(format!(
                    "Cannot navigate to '{part}'"
                )))
            }
        };
    }

    Ok(current.clone())
}
