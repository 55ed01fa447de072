//! LLM provider integration: the chat transport trait, the OpenAI
//! implementation, a canned mock for local development, and token-cost
//! accounting.
//!
//! The remote call is a thin pass-through: operations hand it role-tagged
//! messages plus an output-shape constraint and get back either one parsed
//! structured response or a stream of text deltas followed by a finalized
//! response.

mod cost;
mod mock;
mod openai;
mod provider;

pub use cost::{
    estimate_cost, CompletionTokensDetails, PromptTokensDetails, RateTable, UsageRecord,
};
pub use mock::MockProvider;
pub use openai::OpenAiProvider;
pub use provider::{response_format, ChatCompletion, ChatMessage, ChatProvider, ChatRequest, Role};
