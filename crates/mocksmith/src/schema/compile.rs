//! Schema compiler: column definitions to output-shape constraint + validator.
//!
//! The remote model must emit machine-parseable structured output.
//! Constraining its output shape up front converts "hope the model formats
//! correctly" into "the provider enforces the shape"; local compilation only
//! translates the column vocabulary into the provider's shape vocabulary and
//! re-checks the finalized payload.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::error::{MocksmithError, Result};

use super::column::{ColumnDefinition, FieldKind, FieldSpec, ValueType};

/// Comma optionally surrounded by whitespace, the enum literal separator.
static ENUM_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*,\s*").expect("valid regex"));

/// Validator shape for one column, selected by value type.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnShape {
    Text,
    Number,
    Integer,
    Boolean,
    /// Closed set of string literals.
    Enum(Vec<String>),
    /// Fixed object layout of a structured kind.
    Structured(&'static [FieldSpec]),
}

/// One compiled column: shape plus nullability and the description hint
/// forwarded to the model.
#[derive(Debug, Clone)]
pub struct CompiledColumn {
    pub key: String,
    pub shape: ColumnShape,
    /// True when the column was declared `required: false`.
    pub nullable: bool,
    pub description: Option<String>,
}

/// Composite validator for one row shape.
///
/// Keys are unique and kept in declaration order; the union of all column
/// validators composes into one row-shape validator.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    columns: Vec<CompiledColumn>,
}

impl CompiledSchema {
    /// Compile an ordered list of column definitions.
    ///
    /// Fails with [`MocksmithError::MissingEnumValues`] when an `enum`
    /// column has no usable literal list in its description.
    pub fn compile(definitions: &[ColumnDefinition]) -> Result<Self> {
        let mut columns = Vec::with_capacity(definitions.len());
        for def in definitions {
            let shape = match def.value_type {
                ValueType::Text => ColumnShape::Text,
                ValueType::Number => ColumnShape::Number,
                ValueType::Integer => ColumnShape::Integer,
                ValueType::Boolean => ColumnShape::Boolean,
                ValueType::Enum => ColumnShape::Enum(extract_enum_values(def)?),
                ValueType::Gender => {
                    ColumnShape::Enum(vec!["male".to_string(), "female".to_string()])
                }
                ValueType::FullName
                | ValueType::Date
                | ValueType::Time
                | ValueType::Address
                | ValueType::AddressJp => ColumnShape::Structured(
                    def.value_type.fields().expect("structured type has fields"),
                ),
            };
            columns.push(CompiledColumn {
                key: def.key.clone(),
                shape,
                nullable: !def.required,
                description: def.description.clone(),
            });
        }
        Ok(Self { columns })
    }

    /// Compiled columns in declaration order.
    pub fn columns(&self) -> &[CompiledColumn] {
        &self.columns
    }

    /// JSON Schema for one row: `{ [columnKey]: <column shape> }`.
    ///
    /// Emitted in the provider's strict structured-output dialect: every key
    /// listed in `required`, `additionalProperties: false`, optionality as a
    /// null union.
    pub fn row_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::with_capacity(self.columns.len());
        for col in &self.columns {
            properties.insert(col.key.clone(), col.json_schema());
            required.push(Value::String(col.key.clone()));
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }

    /// Validate one row of the finalized payload against the compiled shape.
    pub fn validate_row(&self, row: &Value) -> std::result::Result<(), String> {
        let obj = row
            .as_object()
            .ok_or_else(|| format!("row is not an object: {row}"))?;
        for col in &self.columns {
            let value = obj.get(&col.key).unwrap_or(&Value::Null);
            if value.is_null() {
                if col.nullable {
                    continue;
                }
                return Err(format!("column '{}': required value is null", col.key));
            }
            col.shape
                .check(value)
                .map_err(|e| format!("column '{}': {e}", col.key))?;
        }
        Ok(())
    }

    /// Validate every row of a generated table.
    pub fn validate_rows(&self, rows: &[Value]) -> std::result::Result<(), String> {
        for (index, row) in rows.iter().enumerate() {
            self.validate_row(row)
                .map_err(|e| format!("row {index}: {e}"))?;
        }
        Ok(())
    }
}

impl CompiledColumn {
    /// JSON Schema fragment for this column, null-union wrapped when
    /// the column is optional.
    fn json_schema(&self) -> Value {
        let mut schema = self.shape.json_schema();
        if let (Some(desc), Some(obj)) = (&self.description, schema.as_object_mut()) {
            // Enum columns keep the literal list out of the hint; it is
            // already encoded in the schema itself.
            if !matches!(self.shape, ColumnShape::Enum(_)) {
                obj.insert("description".to_string(), json!(desc));
            }
        }
        if self.nullable {
            schema = json!({ "anyOf": [schema, { "type": "null" }] });
        }
        schema
    }
}

impl ColumnShape {
    fn json_schema(&self) -> Value {
        match self {
            ColumnShape::Text => json!({ "type": "string" }),
            ColumnShape::Number => json!({ "type": "number" }),
            ColumnShape::Integer => json!({ "type": "integer" }),
            ColumnShape::Boolean => json!({ "type": "boolean" }),
            ColumnShape::Enum(values) => json!({ "type": "string", "enum": values }),
            ColumnShape::Structured(fields) => {
                let mut properties = Map::new();
                let mut required = Vec::with_capacity(fields.len());
                for f in *fields {
                    let field_schema = match f.kind {
                        FieldKind::Str => json!({ "type": "string" }),
                        FieldKind::NullableStr => json!({ "type": ["string", "null"] }),
                        FieldKind::Int => json!({ "type": "integer" }),
                    };
                    properties.insert(f.name.to_string(), field_schema);
                    required.push(Value::String(f.name.to_string()));
                }
                json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                    "additionalProperties": false,
                })
            }
        }
    }

    /// Check a non-null value against this shape.
    fn check(&self, value: &Value) -> std::result::Result<(), String> {
        match self {
            ColumnShape::Text => value
                .is_string()
                .then_some(())
                .ok_or_else(|| format!("expected string, got {value}")),
            ColumnShape::Number => value
                .is_number()
                .then_some(())
                .ok_or_else(|| format!("expected number, got {value}")),
            ColumnShape::Integer => (value.is_i64() || value.is_u64())
                .then_some(())
                .ok_or_else(|| format!("expected integer, got {value}")),
            ColumnShape::Boolean => value
                .is_boolean()
                .then_some(())
                .ok_or_else(|| format!("expected boolean, got {value}")),
            ColumnShape::Enum(values) => {
                let s = value
                    .as_str()
                    .ok_or_else(|| format!("expected enum literal, got {value}"))?;
                if values.iter().any(|v| v == s) {
                    Ok(())
                } else {
                    Err(format!("'{s}' is not one of {values:?}"))
                }
            }
            ColumnShape::Structured(fields) => {
                let obj = value
                    .as_object()
                    .ok_or_else(|| format!("expected object, got {value}"))?;
                for f in *fields {
                    let v = obj.get(f.name).unwrap_or(&Value::Null);
                    let ok = match f.kind {
                        FieldKind::Str => v.is_string(),
                        FieldKind::NullableStr => v.is_string() || v.is_null(),
                        FieldKind::Int => v.is_i64() || v.is_u64(),
                    };
                    if !ok {
                        return Err(format!("field '{}': unexpected value {v}", f.name));
                    }
                }
                Ok(())
            }
        }
    }
}

/// Extract the allowed literals of an `enum` column from its description.
fn extract_enum_values(def: &ColumnDefinition) -> Result<Vec<String>> {
    let description = def
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| MocksmithError::MissingEnumValues {
            column: def.key.clone(),
        })?;
    let values: Vec<String> = ENUM_SPLIT
        .split(description)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    if values.is_empty() {
        return Err(MocksmithError::MissingEnumValues {
            column: def.key.clone(),
        });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile_one(def: ColumnDefinition) -> CompiledSchema {
        CompiledSchema::compile(&[def]).unwrap()
    }

    #[test]
    fn test_enum_extraction() {
        let schema = compile_one(
            ColumnDefinition::new("color", ValueType::Enum)
                .with_description("red, green , blue"),
        );
        for ok in ["red", "green", "blue"] {
            assert!(schema.validate_row(&json!({ "color": ok })).is_ok());
        }
        assert!(schema.validate_row(&json!({ "color": "purple" })).is_err());
    }

    #[test]
    fn test_enum_without_values_fails() {
        let err = CompiledSchema::compile(&[ColumnDefinition::new("color", ValueType::Enum)])
            .unwrap_err();
        assert!(matches!(err, MocksmithError::MissingEnumValues { ref column } if column == "color"));
    }

    #[test]
    fn test_gender_is_fixed_enum() {
        let schema = compile_one(ColumnDefinition::new("gender", ValueType::Gender));
        assert!(schema.validate_row(&json!({ "gender": "male" })).is_ok());
        assert!(schema.validate_row(&json!({ "gender": "female" })).is_ok());
        assert!(schema.validate_row(&json!({ "gender": "other" })).is_err());
    }

    #[test]
    fn test_optional_column_accepts_null() {
        let schema = compile_one(ColumnDefinition::new("age", ValueType::Integer).optional());
        assert!(schema.validate_row(&json!({ "age": null })).is_ok());
        assert!(schema.validate_row(&json!({})).is_ok());
        assert!(schema.validate_row(&json!({ "age": 30 })).is_ok());
    }

    #[test]
    fn test_required_column_rejects_null() {
        let schema = compile_one(ColumnDefinition::new("age", ValueType::Integer));
        assert!(schema.validate_row(&json!({ "age": null })).is_err());
        assert!(schema.validate_row(&json!({})).is_err());
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let schema = compile_one(ColumnDefinition::new("n", ValueType::Integer));
        assert!(schema.validate_row(&json!({ "n": 1 })).is_ok());
        assert!(schema.validate_row(&json!({ "n": 1.5 })).is_err());
    }

    #[test]
    fn test_structured_validation() {
        let schema = compile_one(ColumnDefinition::new("birthday", ValueType::Date));
        assert!(schema
            .validate_row(&json!({ "birthday": { "year": 1990, "month": 5, "day": 15 } }))
            .is_ok());
        assert!(schema
            .validate_row(&json!({ "birthday": { "year": "1990", "month": 5, "day": 15 } }))
            .is_err());
        assert!(schema.validate_row(&json!({ "birthday": {} })).is_err());

        let schema = compile_one(ColumnDefinition::new("name", ValueType::FullName));
        assert!(schema
            .validate_row(&json!({ "name": { "first": "John", "middle": null, "last": "Doe" } }))
            .is_ok());
    }

    #[test]
    fn test_row_schema_strict_shape() {
        let schema = CompiledSchema::compile(&[
            ColumnDefinition::new("name", ValueType::Text).with_description("user name"),
            ColumnDefinition::new("age", ValueType::Integer).optional(),
        ])
        .unwrap();
        let row = schema.row_schema();

        assert_eq!(row["type"], json!("object"));
        assert_eq!(row["additionalProperties"], json!(false));
        assert_eq!(row["required"], json!(["name", "age"]));
        assert_eq!(row["properties"]["name"]["description"], json!("user name"));
        // Optional column is a null union.
        assert!(row["properties"]["age"]["anyOf"].is_array());
    }

    #[test]
    fn test_every_value_type_compiles() {
        for vt in ValueType::all() {
            let mut def = ColumnDefinition::new("col", *vt);
            if *vt == ValueType::Enum {
                def = def.with_description("a, b");
            }
            assert!(CompiledSchema::compile(&[def]).is_ok(), "type {vt} failed");
        }
    }
}
