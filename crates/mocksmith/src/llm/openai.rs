//! OpenAI chat-completions provider.

use std::io::{BufRead, BufReader};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{MocksmithError, Result};

use super::cost::UsageRecord;
use super::provider::{ChatCompletion, ChatProvider, ChatRequest};

/// OpenAI API endpoint.
const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI provider over the blocking HTTP client.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
}

impl OpenAiProvider {
    /// Create a provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            // Streamed responses can stay open for minutes.
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| MocksmithError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            MocksmithError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| MocksmithError::Config(format!("invalid API key: {e}")))?,
        );
        Ok(headers)
    }

    fn request_body(&self, request: &ChatRequest, stream: bool) -> Value {
        let mut body = json!({
            "model": request.model,
            "messages": request.messages,
            "response_format": request.response_format,
            "top_p": request.top_p,
        });
        let obj = body.as_object_mut().expect("body is an object");
        if let Some(temperature) = request.temperature {
            obj.insert("temperature".to_string(), json!(temperature));
        }
        if stream {
            obj.insert("stream".to_string(), json!(true));
            // Usage counters are not reliably available mid-stream; ask the
            // transport to report them inline on the final chunk.
            obj.insert("stream_options".to_string(), json!({ "include_usage": true }));
        }
        body
    }

    fn send(&self, request: &ChatRequest, stream: bool) -> Result<reqwest::blocking::Response> {
        let response = self
            .client
            .post(API_URL)
            .headers(self.build_headers()?)
            .json(&self.request_body(request, stream))
            .send()
            .map_err(|e| MocksmithError::Provider {
                status: None,
                message: format!("API request failed: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().unwrap_or_default();
            return Err(MocksmithError::Provider {
                status: Some(status),
                message: format!("OpenAI API error: {error_text}"),
            });
        }
        Ok(response)
    }
}

impl ChatProvider for OpenAiProvider {
    fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion> {
        let response = self.send(request, false)?;
        let parsed: CompletionResponse =
            response.json().map_err(|e| MocksmithError::Provider {
                status: None,
                message: format!("failed to parse API response: {e}"),
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| MocksmithError::Provider {
                status: None,
                message: "no content in OpenAI response".to_string(),
            })?;

        Ok(ChatCompletion {
            content,
            usage: parsed.usage,
        })
    }

    fn complete_streaming(
        &self,
        request: &ChatRequest,
        on_fragment: &mut dyn FnMut(&str) -> Result<()>,
    ) -> Result<ChatCompletion> {
        let response = self.send(request, true)?;

        let mut content = String::new();
        let mut usage: Option<UsageRecord> = None;
        let reader = BufReader::new(response);

        for line in reader.lines() {
            let line =
                line.map_err(|e| MocksmithError::Stream(format!("transport error: {e}")))?;
            let Some(data) = line.strip_prefix("data: ") else {
                continue;
            };
            if data == "[DONE]" {
                break;
            }
            let chunk: StreamChunk = serde_json::from_str(data)
                .map_err(|e| MocksmithError::Stream(format!("malformed stream chunk: {e}")))?;
            if let Some(u) = chunk.usage {
                usage = Some(u);
            }
            if let Some(delta) = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.delta.content)
            {
                content.push_str(&delta);
                on_fragment(&delta)?;
            }
        }

        Ok(ChatCompletion { content, usage })
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Non-streaming API response structure.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsageRecord>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

/// One SSE chunk of a streamed response.
#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    usage: Option<UsageRecord>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}
