//! Chat provider trait and request/response types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::Result;

use super::cost::UsageRecord;

/// Message role in a chat completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One structured-output completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Output-shape constraint, in the provider's `response_format` dialect
    /// (see [`response_format`]).
    pub response_format: Value,
    pub top_p: f64,
    pub temperature: Option<f64>,
}

/// Parsed result of one completion call.
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    /// Raw structured content (a JSON document matching the constraint).
    pub content: String,
    /// Token usage, when the transport reported it.
    pub usage: Option<UsageRecord>,
}

/// Wrap a JSON Schema into the provider's strict structured-output
/// `response_format` envelope.
pub fn response_format(name: &str, schema: Value) -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": name,
            "strict": true,
            "schema": schema,
        }
    })
}

/// A remote (or canned) chat completion transport.
///
/// Implementations must be thread-safe (`Send + Sync`) so one provider can
/// back multiple sequential operations.
pub trait ChatProvider: Send + Sync {
    /// Issue a non-streaming call; the full structured content comes back
    /// in one piece.
    fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion>;

    /// Issue a streaming call, handing every text delta to `on_fragment` as
    /// it arrives. An error from the callback aborts the stream. Returns
    /// the finalized completion (concatenated content, plus usage when the
    /// transport's streaming mode reports it inline).
    fn complete_streaming(
        &self,
        request: &ChatRequest,
        on_fragment: &mut dyn FnMut(&str) -> Result<()>,
    ) -> Result<ChatCompletion>;

    /// Provider name, for logging/debugging.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization() {
        let msg = ChatMessage::system("hello");
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v, json!({ "role": "system", "content": "hello" }));
    }

    #[test]
    fn test_response_format_envelope() {
        let rf = response_format("table", json!({ "type": "object" }));
        assert_eq!(rf["type"], "json_schema");
        assert_eq!(rf["json_schema"]["name"], "table");
        assert_eq!(rf["json_schema"]["strict"], true);
        assert_eq!(rf["json_schema"]["schema"]["type"], "object");
    }
}
