use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::errors::AgentResult;

use super::capability::Capability;

/// Reports the current UTC date and time.
pub struct CurrentTime;

#[async_trait]
impl Capability for CurrentTime {
    fn name(&self) -> &str {
        "current_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time in various formats."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "format": {
                    "type": "string",
                    "description": "Output format: 'iso', 'date', 'time', 'datetime'",
                    "enum": ["iso", "date", "time", "datetime"]
                }
            },
            "required": []
        })
    }

    async fn call(&self, arguments: Value) -> AgentResult<Value> {
        let format = arguments
            .get("format")
            .and_then(|v| v.as_str())
            .unwrap_or("iso");
        let now = Utc::now();

        let rendered = match format {
            "date" => now.format("%Y-%m-%d").to_string(),
            "time" => now.format("%H:%M:%S").to_string(),
            "datetime" => now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            // Unknown formats fall back to ISO-8601, same as no format
            _ => now.to_rfc3339_opts(SecondsFormat::Secs, true),
        };

        Ok(Value::String(rendered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_date_format() {
        let result = CurrentTime.call(json!({"format": "date"})).await.unwrap();
        let date = result.as_str().unwrap();
        assert_eq!(date.len(), 10); // YYYY-MM-DD
        assert_eq!(date.matches('-').count(), 2);
    }

    #[tokio::test]
    async fn test_iso_is_default() {
        let result = CurrentTime.call(json!({})).await.unwrap();
        let iso = result.as_str().unwrap();
        assert!(iso.ends_with('Z'));
        assert!(iso.contains('T'));
    }

    #[tokio::test]
    async fn test_datetime_format() {
        let result = CurrentTime
            .call(json!({"format": "datetime"}))
            .await
            .unwrap();
        assert!(result.as_str().unwrap().ends_with(" UTC"));
    }
}
