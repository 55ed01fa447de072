//! Mocksmith: LLM-backed structured generation for mock table data,
//! bilingual requirement definitions, and glossary-aware translation.
//!
//! The engineering core is small and composable:
//!
//! - **Schema compiler** ([`CompiledSchema`]): maps an ordered list of
//!   column definitions into one composite validator that both constrains
//!   the remote model's output shape and re-checks the returned payload.
//! - **Streaming result reducer** ([`StreamReducer`]): consumes raw text
//!   deltas of a streaming response, incrementally parses them as one
//!   growing JSON document, and emits best-effort partial snapshots
//!   (summary + growing item list) so callers can render progressively.
//!
//! Everything else is thin plumbing around a [`ChatProvider`]: the OpenAI
//! transport, a canned mock for local development, and a token-cost
//! estimator.
//!
//! # Example
//!
//! ```no_run
//! use mocksmith::{ColumnDefinition, MockProvider, Mocksmith, ValueType};
//!
//! let engine = Mocksmith::new(MockProvider::new());
//! let columns = vec![
//!     ColumnDefinition::new("name", ValueType::FullName),
//!     ColumnDefinition::new("age", ValueType::Integer).optional(),
//! ];
//! let result = engine
//!     .generate_table_data(&columns, "Five users of a web shop", None)
//!     .unwrap();
//!
//! println!("{} rows (${:.6})", result.table.data.len(), result.price);
//! ```

pub mod error;
pub mod llm;
pub mod schema;
pub mod stream;

mod mocksmith;
pub mod requirements;
pub mod tabledata;
pub mod translation;

pub use crate::mocksmith::{GenerationConfig, Mocksmith};
pub use error::{MocksmithError, Result};
pub use llm::{
    estimate_cost, ChatProvider, MockProvider, OpenAiProvider, RateTable, UsageRecord,
};
pub use requirements::{
    RequirementAnalysis, RequirementAnalysisResult, RequirementDefinition, RequirementItem,
    RequirementKind,
};
pub use schema::{
    format_cells, ColumnDefinition, CompiledSchema, DateOrder, FormatConfig, ValueType,
};
pub use stream::{JsonStreamBuilder, Snapshot, StreamReducer};
pub use tabledata::{table_to_csv, TableData, TableDataResult};
pub use translation::{TranslationData, TranslationPattern, TranslationResult, WordDefinition};
