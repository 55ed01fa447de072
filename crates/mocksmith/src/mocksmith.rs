//! Main Mocksmith struct and the shared request plumbing for all three
//! operations.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{MocksmithError, Result};
use crate::llm::{estimate_cost, ChatMessage, ChatProvider, ChatRequest, RateTable};
use crate::stream::{Snapshot, StreamReducer};

/// Sampling and model configuration, passed explicitly into every call.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Model identifier; also keys the static rate table for pricing.
    pub model: String,
    /// Nucleus sampling parameter (0.0-2.0).
    pub top_p: f64,
    /// Sampling temperature; provider default when unset.
    pub temperature: Option<f64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-2024-08-06".to_string(),
            top_p: 0.5,
            temperature: None,
        }
    }
}

/// The structured-generation engine: one provider plus one configuration.
///
/// Per-call state (the streaming reducer) is fully encapsulated within each
/// call's lifetime; one `Mocksmith` can serve many sequential requests.
pub struct Mocksmith {
    config: GenerationConfig,
    provider: Arc<dyn ChatProvider>,
}

impl Mocksmith {
    /// Create an engine with default configuration.
    pub fn new(provider: impl ChatProvider + 'static) -> Self {
        Self::with_config(provider, GenerationConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(provider: impl ChatProvider + 'static, config: GenerationConfig) -> Self {
        Self {
            config,
            provider: Arc::new(provider),
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Name of the backing provider (for logging/debugging).
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Issue one structured completion and return the finalized document
    /// plus its estimated cost in USD.
    ///
    /// With a progress callback the call streams: every fragment runs
    /// through a [`StreamReducer`] watching `summary` and `items_key`, and
    /// the callback sees one snapshot per resolved value. The finalized
    /// document always comes from parsing the full response text; partial
    /// snapshots are advisory only.
    pub(crate) fn run_structured(
        &self,
        messages: Vec<ChatMessage>,
        response_format: Value,
        items_key: &str,
        on_progress: Option<&mut dyn FnMut(Snapshot)>,
    ) -> Result<(Value, f64)> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            response_format,
            top_p: self.config.top_p,
            temperature: self.config.temperature,
        };
        let rates = RateTable::for_model(&self.config.model);
        let streamed = on_progress.is_some();

        let completion = match on_progress {
            Some(on_progress) => {
                let mut reducer = StreamReducer::new(items_key);
                self.provider.complete_streaming(&request, &mut |fragment| {
                    reducer.apply(fragment, &mut *on_progress)
                })?
            }
            None => self.provider.complete(&request)?,
        };

        let document: Value = serde_json::from_str(&completion.content).map_err(|e| {
            if streamed {
                MocksmithError::Stream(format!("finalization failed: {e}"))
            } else {
                MocksmithError::Provider {
                    status: None,
                    message: format!("malformed structured response: {e}"),
                }
            }
        })?;

        Ok((document, estimate_cost(completion.usage.as_ref(), &rates)))
    }

    /// Map a finalization/validation failure to the path-appropriate error.
    pub(crate) fn finalization_error(streamed: bool, message: String) -> MocksmithError {
        if streamed {
            MocksmithError::Stream(message)
        } else {
            MocksmithError::Provider {
                status: None,
                message,
            }
        }
    }
}
