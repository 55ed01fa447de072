//! Requirement analysis: informal feature requests to structured bilingual
//! requirement definitions.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::Result;
use crate::llm::{response_format, ChatMessage};
use crate::mocksmith::Mocksmith;
use crate::stream::Snapshot;

/// Kind of one requirement item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequirementKind {
    Functional,
    NonFunctional,
    Note,
    ExampleCode,
}

/// One bilingual requirement statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementItem {
    #[serde(rename = "type")]
    pub kind: RequirementKind,
    /// English statement.
    pub en: String,
    /// Japanese statement.
    pub ja: String,
}

/// A category of requirement items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementDefinition {
    pub category: String,
    pub items: Vec<RequirementItem>,
}

/// Full analysis: Japanese summary plus categorized definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementAnalysis {
    pub summary: String,
    #[serde(rename = "requirementDefinitions")]
    pub requirement_definitions: Vec<RequirementDefinition>,
}

/// Outcome of one analysis request.
#[derive(Debug, Clone)]
pub struct RequirementAnalysisResult {
    /// Estimated cost in USD; 0 when the transport reported no usage.
    pub price: f64,
    pub analysis: RequirementAnalysis,
}

fn system_prompt(system_desc: &str) -> String {
    format!(
        "以下システムに対して、要求に基づき要件定義してください。\nシステムの解説:\n{system_desc}"
    )
}

fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "summary": {
                "type": "string",
                "description": "Summarize requirements analysis in Japanese"
            },
            "requirementDefinitions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string" },
                        "items": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "type": {
                                        "type": "string",
                                        "enum": ["functional", "non-functional", "note", "example-code"]
                                    },
                                    "en": { "type": "string", "description": "in English" },
                                    "ja": { "type": "string", "description": "in Japanese" }
                                },
                                "required": ["type", "en", "ja"],
                                "additionalProperties": false
                            }
                        }
                    },
                    "required": ["category", "items"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["summary", "requirementDefinitions"],
        "additionalProperties": false
    })
}

impl Mocksmith {
    /// Translate an informal feature request into structured bilingual
    /// requirement definitions for the described system.
    pub fn analyze_requirements(
        &self,
        system_desc: &str,
        request: &str,
        on_progress: Option<&mut dyn FnMut(Snapshot)>,
    ) -> Result<RequirementAnalysisResult> {
        let messages = vec![
            ChatMessage::system(system_prompt(system_desc)),
            ChatMessage::user(request),
        ];

        let streamed = on_progress.is_some();
        let (document, price) = self.run_structured(
            messages,
            response_format("definitions", response_schema()),
            "requirementDefinitions",
            on_progress,
        )?;

        let analysis: RequirementAnalysis = serde_json::from_value(document).map_err(|e| {
            Mocksmith::finalization_error(streamed, format!("unexpected analysis shape: {e}"))
        })?;

        Ok(RequirementAnalysisResult { price, analysis })
    }
}
