//! Mock table-data generation against a user-specified column schema.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{MocksmithError, Result};
use crate::llm::{response_format, ChatMessage};
use crate::mocksmith::Mocksmith;
use crate::schema::{format_cells, ColumnDefinition, CompiledSchema, FormatConfig};
use crate::stream::Snapshot;

const SYSTEM_PROMPT: &str = "Please generate mock data based on requirements.";

/// Generated table: summary plus one JSON object per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub summary: String,
    pub data: Vec<Value>,
}

/// Outcome of one generation request.
#[derive(Debug, Clone)]
pub struct TableDataResult {
    /// Estimated cost in USD; 0 when the transport reported no usage.
    pub price: f64,
    pub table: TableData,
}

impl Mocksmith {
    /// Generate mock rows matching `definitions` from a natural-language
    /// request.
    ///
    /// With a progress callback the call streams and the callback receives
    /// partial snapshots as rows resolve. The returned table always comes
    /// from the finalized response, validated against the compiled schema.
    pub fn generate_table_data(
        &self,
        definitions: &[ColumnDefinition],
        request: &str,
        on_progress: Option<&mut dyn FnMut(Snapshot)>,
    ) -> Result<TableDataResult> {
        let schema = CompiledSchema::compile(definitions)?;
        let response_schema = json!({
            "type": "object",
            "properties": {
                "data": { "type": "array", "items": schema.row_schema() },
                "summary": { "type": "string", "description": "Summarize data info in Japanese" },
            },
            "required": ["data", "summary"],
            "additionalProperties": false,
        });
        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(request),
        ];

        let streamed = on_progress.is_some();
        let (document, price) = self.run_structured(
            messages,
            response_format("table", response_schema),
            "data",
            on_progress,
        )?;

        let table: TableData = serde_json::from_value(document).map_err(|e| {
            Mocksmith::finalization_error(streamed, format!("unexpected table shape: {e}"))
        })?;
        schema.validate_rows(&table.data).map_err(|e| {
            Mocksmith::finalization_error(streamed, format!("table failed schema validation: {e}"))
        })?;

        Ok(TableDataResult { price, table })
    }
}

/// Render a generated table as CSV, honoring per-column `split` flags.
pub fn table_to_csv(
    table: &TableData,
    definitions: &[ColumnDefinition],
    config: &FormatConfig,
) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let headers: Vec<String> = definitions.iter().flat_map(|d| d.header_cells()).collect();
    writer.write_record(&headers)?;

    for row in &table.data {
        let mut record: Vec<String> = Vec::with_capacity(headers.len());
        for def in definitions {
            record.extend(format_cells(def, row.get(&def.key), config, true));
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| MocksmithError::Config(format!("CSV buffer error: {e}")))?;
    String::from_utf8(bytes).map_err(|e| MocksmithError::Config(format!("CSV encoding error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValueType;

    fn table() -> TableData {
        TableData {
            summary: "two users".to_string(),
            data: vec![
                json!({
                    "name": { "first": "John", "middle": null, "last": "Doe" },
                    "age": 30,
                    "active": true
                }),
                json!({
                    "name": { "first": "Anna", "middle": "Maria", "last": "Smith" },
                    "age": null,
                    "active": false
                }),
            ],
        }
    }

    fn definitions() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("name", ValueType::FullName).with_split(),
            ColumnDefinition::new("age", ValueType::Integer).optional(),
            ColumnDefinition::new("active", ValueType::Boolean),
        ]
    }

    #[test]
    fn test_csv_export() {
        let csv = table_to_csv(&table(), &definitions(), &FormatConfig::default()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "name_first,name_middle,name_last,age,active"
        );
        assert_eq!(lines.next().unwrap(), "John,,Doe,30,TRUE");
        assert_eq!(lines.next().unwrap(), "Anna,Maria,Smith,,FALSE");
    }

    #[test]
    fn test_csv_export_collapsed() {
        let defs = vec![
            ColumnDefinition::new("name", ValueType::FullName),
            ColumnDefinition::new("age", ValueType::Integer).optional(),
            ColumnDefinition::new("active", ValueType::Boolean),
        ];
        let csv = table_to_csv(&table(), &defs, &FormatConfig::default()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "name,age,active");
        assert_eq!(lines.next().unwrap(), "John Doe,30,TRUE");
    }
}
