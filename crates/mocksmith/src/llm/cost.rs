//! Token-usage accounting and cost estimation.

use serde::{Deserialize, Serialize};

/// Raw token counters from one remote call. Consumed only by
/// [`estimate_cost`]; not persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageRecord {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens_details: Option<PromptTokensDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens_details: Option<CompletionTokensDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptTokensDetails {
    #[serde(default)]
    pub cached_tokens: u64,
    #[serde(default)]
    pub audio_tokens: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionTokensDetails {
    #[serde(default)]
    pub audio_tokens: u64,
    /// Present for reasoning models; carried but not priced (see
    /// [`estimate_cost`]).
    #[serde(default)]
    pub reasoning_tokens: u64,
}

/// Per-million-token USD rates for one model. Static configuration, keyed
/// by model identifier via [`RateTable::for_model`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateTable {
    pub input_text: f64,
    pub input_cached: f64,
    pub input_audio: f64,
    pub output_text: f64,
    pub output_audio: f64,
}

impl RateTable {
    /// All-zero rates: unknown models price every call at 0.
    pub const ZERO: RateTable = RateTable {
        input_text: 0.0,
        input_cached: 0.0,
        input_audio: 0.0,
        output_text: 0.0,
        output_audio: 0.0,
    };

    /// Look up the static rate table for a model identifier.
    pub fn for_model(model: &str) -> RateTable {
        if model.starts_with("gpt-4o-mini") {
            RateTable {
                input_text: 0.150,
                input_cached: 0.075,
                input_audio: 0.0,
                output_text: 0.6,
                output_audio: 0.0,
            }
        } else if model.starts_with("gpt-4o") {
            RateTable {
                input_text: 2.5,
                input_cached: 1.25,
                input_audio: 100.0,
                output_text: 10.0,
                output_audio: 200.0,
            }
        } else {
            RateTable::ZERO
        }
    }
}

/// Estimate the USD cost of one call from its token counters.
///
/// Prompt tokens decompose into cached, audio, and raw-text buckets
/// (raw = total - cached - audio); completion tokens into audio and
/// raw-text. Each bucket is priced at its per-million rate and summed.
///
/// Returns 0 when no usage record is available (streaming without inline
/// usage reporting). Reasoning-token buckets are not supported and are
/// excluded from the computation.
pub fn estimate_cost(usage: Option<&UsageRecord>, rates: &RateTable) -> f64 {
    let Some(usage) = usage else {
        return 0.0;
    };

    let input_audio = usage
        .prompt_tokens_details
        .as_ref()
        .map_or(0, |d| d.audio_tokens);
    let input_cached = usage
        .prompt_tokens_details
        .as_ref()
        .map_or(0, |d| d.cached_tokens);
    let input_raw = usage
        .prompt_tokens
        .saturating_sub(input_audio)
        .saturating_sub(input_cached);

    let output_audio = usage
        .completion_tokens_details
        .as_ref()
        .map_or(0, |d| d.audio_tokens);
    let output_raw = usage.completion_tokens.saturating_sub(output_audio);

    (rates.input_text * input_raw as f64
        + rates.input_audio * input_audio as f64
        + rates.input_cached * input_cached as f64
        + rates.output_text * output_raw as f64
        + rates.output_audio * output_audio as f64)
        / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_usage_is_free() {
        let rates = RateTable::for_model("gpt-4o-2024-08-06");
        assert_eq!(estimate_cost(None, &rates), 0.0);
    }

    #[test]
    fn test_bucket_sum() {
        let usage = UsageRecord {
            prompt_tokens: 100,
            completion_tokens: 50,
            prompt_tokens_details: Some(PromptTokensDetails {
                cached_tokens: 20,
                audio_tokens: 0,
            }),
            completion_tokens_details: Some(CompletionTokensDetails::default()),
        };
        let rates = RateTable {
            input_text: 2.5,
            input_cached: 1.25,
            input_audio: 0.0,
            output_text: 10.0,
            output_audio: 0.0,
        };
        let expected = (2.5 * 80.0 + 1.25 * 20.0 + 10.0 * 50.0) / 1_000_000.0;
        assert!((estimate_cost(Some(&usage), &rates) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_missing_details_treated_as_zero() {
        let usage = UsageRecord {
            prompt_tokens: 10,
            completion_tokens: 10,
            ..Default::default()
        };
        let rates = RateTable::for_model("gpt-4o-2024-08-06");
        let expected = (2.5 * 10.0 + 10.0 * 10.0) / 1_000_000.0;
        assert!((estimate_cost(Some(&usage), &rates) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_model_rates_are_zero() {
        assert_eq!(RateTable::for_model("some-other-model"), RateTable::ZERO);
        let usage = UsageRecord {
            prompt_tokens: 1000,
            completion_tokens: 1000,
            ..Default::default()
        };
        assert_eq!(
            estimate_cost(Some(&usage), &RateTable::for_model("some-other-model")),
            0.0
        );
    }

    #[test]
    fn test_usage_deserializes_from_wire_shape() {
        let json = r#"{
            "prompt_tokens": 211,
            "completion_tokens": 436,
            "total_tokens": 647,
            "prompt_tokens_details": { "cached_tokens": 0 },
            "completion_tokens_details": { "reasoning_tokens": 0 }
        }"#;
        let usage: UsageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(usage.prompt_tokens, 211);
        assert_eq!(usage.completion_tokens, 436);
    }
}
