//! JSON-RPC 2.0 error objects for the MCP transport.
//!
//! Tool failures never surface here: they travel inside a successful
//! `tools/call` response as `{content, isError: true}`. This type only covers
//! protocol-level problems (bad JSON, unknown methods, malformed params).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result type for protocol handling.
pub type Result<T> = std::result::Result<T, RpcError>;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// A JSON-RPC error object.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq)]
#[error("{message}")]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach structured detail.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn parse_error(detail: impl Into<String>) -> Self {
        Self::new(PARSE_ERROR, format!("Parse error: {}", detail.into()))
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::new(INVALID_REQUEST, format!("Invalid request: {}", reason.into()))
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Unknown method: {}", method))
    }

    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, format!("Invalid params: {}", reason.into()))
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, format!("Internal error: {}", reason.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_not_found_names_the_method() {
        let err = RpcError::method_not_found("resources/list");
        assert_eq!(err.code, -32601);
        assert_eq!(err.message, "Unknown method: resources/list");
    }

    #[test]
    fn data_is_omitted_when_absent() {
        let value = serde_json::to_value(RpcError::invalid_params("missing tool name")).unwrap();
        assert_eq!(
            value,
            json!({"code": -32602, "message": "Invalid params: missing tool name"})
        );

        let value =
            serde_json::to_value(RpcError::parse_error("eof").with_data(json!({"line": 3})))
                .unwrap();
        assert_eq!(value["data"], json!({"line": 3}));
        assert_eq!(value["code"], -32700);
    }
}
