use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard response wrapper shared by every route.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiResponse {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
                details: None,
            }),
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        if let Some(error) = &mut self.error {
            error.details = Some(details);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let serialized = serde_json::to_value(ApiResponse::success(json!({"ok": 1}))).unwrap();
        assert_eq!(serialized, json!({"success": true, "data": {"ok": 1}}));
    }

    #[test]
    fn test_error_envelope() {
        let response = ApiResponse::error("AGENT_NOT_FOUND", "Agent not found: ghost")
            .with_details(json!({"toolResults": []}));
        let serialized = serde_json::to_value(response).unwrap();
        assert_eq!(
            serialized,
            json!({
                "success": false,
                "error": {
                    "code": "AGENT_NOT_FOUND",
                    "message": "Agent not found: ghost",
                    "details": {"toolResults": []}
                }
            })
        );
    }
}
