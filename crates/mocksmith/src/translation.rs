//! Glossary-aware translation of arbitrary text.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::Result;
use crate::llm::{response_format, ChatMessage};
use crate::mocksmith::Mocksmith;
use crate::stream::Snapshot;

/// One glossary entry: a domain term and its fixed translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDefinition {
    pub category: String,
    pub ja: String,
    pub en: String,
}

/// One candidate translation with a nuance note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationPattern {
    /// English translated text.
    pub en: String,
    /// Explanation, in Japanese, of the English sentence's nuances.
    pub nuance: String,
}

/// Full translation output: Japanese summary plus candidate patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationData {
    pub summary: String,
    pub data: Vec<TranslationPattern>,
}

/// Outcome of one translation request.
#[derive(Debug, Clone)]
pub struct TranslationResult {
    /// Estimated cost in USD; 0 when the transport reported no usage.
    pub price: f64,
    pub translated: TranslationData,
}

fn system_prompt(glossary: &[WordDefinition], instruction: &str) -> String {
    let terms = glossary
        .iter()
        .map(|w| format!("{}\t{}\t{}", w.category, w.ja, w.en))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are a professional translator. \
         Below is a list of TSV format terms to consider for translation:\n\n\
         Category\tJapanese\tEnglish\n{terms}\n\n{instruction}"
    )
}

fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "summary": {
                "type": "string",
                "description": "Summarize the main points of the translation in Japanese."
            },
            "data": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "en": { "type": "string", "description": "English translated text" },
                        "nuance": {
                            "type": "string",
                            "description": "Explanation of the nuances of English sentences in Japanese"
                        }
                    },
                    "required": ["en", "nuance"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["summary", "data"],
        "additionalProperties": false
    })
}

impl Mocksmith {
    /// Translate `source_text` per `instruction`, holding the glossary's
    /// term translations fixed.
    pub fn translate(
        &self,
        glossary: &[WordDefinition],
        instruction: &str,
        source_text: &str,
        on_progress: Option<&mut dyn FnMut(Snapshot)>,
    ) -> Result<TranslationResult> {
        let messages = vec![
            ChatMessage::system(system_prompt(glossary, instruction)),
            ChatMessage::user(source_text),
        ];

        let streamed = on_progress.is_some();
        let (document, price) = self.run_structured(
            messages,
            response_format("translated", response_schema()),
            "data",
            on_progress,
        )?;

        let translated: TranslationData = serde_json::from_value(document).map_err(|e| {
            Mocksmith::finalization_error(streamed, format!("unexpected translation shape: {e}"))
        })?;

        Ok(TranslationResult { price, translated })
    }
}
