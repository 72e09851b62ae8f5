//! The uniform `{content, isError}` envelope every tool call returns.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Error;

/// One content item. Only text is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Content::Text { text } => text,
        }
    }
}

/// Result envelope for a tool call. Failures are flagged with `is_error`
/// rather than raised, so the transport never has to handle them specially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<Content>,
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: true,
        }
    }

    /// Successful result carrying `output` as pretty-printed JSON.
    pub fn json<T: Serialize>(output: &T) -> Self {
        match serde_json::to_string_pretty(output) {
            Ok(text) => Self::text(text),
            Err(err) => Self::error(format!("Error: failed to serialize result: {}", err)),
        }
    }

    /// Fold a transcoder outcome into the envelope.
    ///
    /// Upstream rejections already read `<Operation> failed: <message>`;
    /// everything else (transport, decoding, validation) is prefixed with
    /// `Error:`.
    pub fn from_outcome<T: Serialize>(outcome: Result<T, Error>) -> Self {
        match outcome {
            Ok(output) => Self::json(&output),
            Err(err) if err.is_upstream() => Self::error(err.to_string()),
            Err(err) => {
                warn!(error = %err, "tool call failed");
                Self::error(format!("Error: {}", err))
            }
        }
    }

    /// Concatenated text of all content items.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(Content::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Operation;
    use serde_json::json;

    #[test]
    fn serializes_to_mcp_shape() {
        let value = serde_json::to_value(ToolResult::error("Unknown tool: maps_nope")).unwrap();
        assert_eq!(
            value,
            json!({
                "content": [{"type": "text", "text": "Unknown tool: maps_nope"}],
                "isError": true
            })
        );
    }

    #[test]
    fn json_output_is_pretty_printed() {
        let result = ToolResult::json(&json!({"place_id": "P1"}));
        assert!(!result.is_error);
        assert_eq!(result.text_content(), "{\n  \"place_id\": \"P1\"\n}");
    }

    #[test]
    fn outcome_errors_are_flagged() {
        let upstream: Result<(), Error> = Err(Error::upstream(Operation::Elevation, "INVALID_REQUEST"));
        let result = ToolResult::from_outcome(upstream);
        assert!(result.is_error);
        assert_eq!(result.text_content(), "Elevation request failed: INVALID_REQUEST");

        let invalid: Result<(), Error> = Err(Error::invalid_argument("address", "must not be empty"));
        let result = ToolResult::from_outcome(invalid);
        assert!(result.is_error);
        assert!(result.text_content().starts_with("Error: "));
    }
}
