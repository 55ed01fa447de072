//! Column definitions and the closed value-type vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MocksmithError;

/// Semantic value type of a column.
///
/// Primitive kinds map to a single JSON scalar; structured kinds have a
/// fixed sub-field layout known at compile time (see [`ValueType::fields`]).
/// The vocabulary is closed: user-defined structured types do not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueType {
    /// Any string.
    Text,
    /// Any real number.
    Number,
    /// Integer-constrained number.
    Integer,
    /// Boolean value.
    Boolean,
    /// One of the literals listed in the column description.
    Enum,
    /// Person name: `{first, middle|null, last|null}`.
    FullName,
    /// Calendar date: `{year, month, day}`.
    Date,
    /// Wall-clock time: `{hour, minute, second}`.
    Time,
    /// Western-style address: `{country|null, zipCode|null, address}`.
    Address,
    /// Japanese address: `{zipCode, prefecture, municipality, others}`.
    AddressJp,
    /// Fixed two-value enumeration `male`/`female`.
    Gender,
}

/// Scalar kind of one sub-field of a structured value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    NullableStr,
    Int,
}

/// One sub-field of a structured value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name of the sub-field in the model's JSON output.
    pub name: &'static str,
    /// Suffix appended to the column key in split (flattened) mode.
    pub suffix: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, suffix: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, suffix, kind }
}

const FULLNAME_FIELDS: &[FieldSpec] = &[
    field("first", "first", FieldKind::Str),
    field("middle", "middle", FieldKind::NullableStr),
    field("last", "last", FieldKind::NullableStr),
];

const DATE_FIELDS: &[FieldSpec] = &[
    field("year", "year", FieldKind::Int),
    field("month", "month", FieldKind::Int),
    field("day", "day", FieldKind::Int),
];

const TIME_FIELDS: &[FieldSpec] = &[
    field("hour", "hour", FieldKind::Int),
    field("minute", "minute", FieldKind::Int),
    field("second", "second", FieldKind::Int),
];

const ADDRESS_FIELDS: &[FieldSpec] = &[
    field("country", "country", FieldKind::NullableStr),
    field("zipCode", "zip", FieldKind::NullableStr),
    field("address", "detail", FieldKind::Str),
];

const ADDRESS_JP_FIELDS: &[FieldSpec] = &[
    field("zipCode", "zip", FieldKind::Str),
    field("prefecture", "pref", FieldKind::Str),
    field("municipality", "muni", FieldKind::Str),
    field("others", "other", FieldKind::Str),
];

impl ValueType {
    /// Sub-field layout for structured kinds, `None` for scalar kinds.
    pub fn fields(&self) -> Option<&'static [FieldSpec]> {
        match self {
            ValueType::FullName => Some(FULLNAME_FIELDS),
            ValueType::Date => Some(DATE_FIELDS),
            ValueType::Time => Some(TIME_FIELDS),
            ValueType::Address => Some(ADDRESS_FIELDS),
            ValueType::AddressJp => Some(ADDRESS_JP_FIELDS),
            ValueType::Text
            | ValueType::Number
            | ValueType::Integer
            | ValueType::Boolean
            | ValueType::Enum
            | ValueType::Gender => None,
        }
    }

    /// Number of cells this type occupies in split (flattened) mode.
    pub fn cell_count(&self) -> usize {
        self.fields().map_or(1, <[FieldSpec]>::len)
    }

    /// Wire name of the type, as used in UI-supplied column JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Number => "number",
            ValueType::Integer => "integer",
            ValueType::Boolean => "boolean",
            ValueType::Enum => "enum",
            ValueType::FullName => "fullname",
            ValueType::Date => "date",
            ValueType::Time => "time",
            ValueType::Address => "address",
            ValueType::AddressJp => "address_jp",
            ValueType::Gender => "gender",
        }
    }

    /// All members of the vocabulary, in declaration order.
    pub fn all() -> &'static [ValueType] {
        &[
            ValueType::Text,
            ValueType::Number,
            ValueType::Integer,
            ValueType::Boolean,
            ValueType::Enum,
            ValueType::FullName,
            ValueType::Date,
            ValueType::Time,
            ValueType::Address,
            ValueType::AddressJp,
            ValueType::Gender,
        ]
    }
}

impl FromStr for ValueType {
    type Err = MocksmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ValueType::Text),
            "number" => Ok(ValueType::Number),
            "integer" => Ok(ValueType::Integer),
            "boolean" => Ok(ValueType::Boolean),
            "enum" => Ok(ValueType::Enum),
            "fullname" => Ok(ValueType::FullName),
            "date" => Ok(ValueType::Date),
            "time" => Ok(ValueType::Time),
            "address" => Ok(ValueType::Address),
            "address_jp" => Ok(ValueType::AddressJp),
            "gender" => Ok(ValueType::Gender),
            other => Err(MocksmithError::UnknownType {
                type_name: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ValueType {
    type Error = MocksmithError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ValueType> for String {
    fn from(t: ValueType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output field the remote model must populate.
///
/// Constructed from user-edited schema state; immutable for the duration of
/// one generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column key, unique within one schema.
    pub key: String,
    /// Semantic value type.
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Render structured values as one cell per sub-field.
    #[serde(default)]
    pub split: bool,
    /// Free-text hint for the model. For `enum` columns this carries the
    /// comma-separated list of allowed literals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When false, the model may emit null for this column.
    #[serde(default)]
    pub required: bool,
}

impl ColumnDefinition {
    /// Create a required column with no description.
    pub fn new(key: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            key: key.into(),
            value_type,
            split: false,
            description: None,
            required: true,
        }
    }

    /// Attach a description hint.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the column as optional (model may emit null).
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Render structured values as one cell per sub-field.
    pub fn with_split(mut self) -> Self {
        self.split = true;
        self
    }

    /// Header cells for this column: the key itself, or key + sub-field
    /// suffixes when `split` is set on a structured type.
    pub fn header_cells(&self) -> Vec<String> {
        match (self.split, self.value_type.fields()) {
            (true, Some(fields)) => fields
                .iter()
                .map(|f| format!("{}_{}", self.key, f.suffix))
                .collect(),
            _ => vec![self.key.clone()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_round_trip() {
        for vt in ValueType::all() {
            let parsed: ValueType = vt.as_str().parse().unwrap();
            assert_eq!(parsed, *vt);
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = "bogus".parse::<ValueType>().unwrap_err();
        assert!(matches!(
            err,
            MocksmithError::UnknownType { ref type_name } if type_name == "bogus"
        ));
    }

    #[test]
    fn test_unknown_type_rejected_in_json() {
        let json = r#"{"key": "x", "type": "bogus"}"#;
        assert!(serde_json::from_str::<ColumnDefinition>(json).is_err());
    }

    #[test]
    fn test_cell_counts() {
        assert_eq!(ValueType::Text.cell_count(), 1);
        assert_eq!(ValueType::FullName.cell_count(), 3);
        assert_eq!(ValueType::Date.cell_count(), 3);
        assert_eq!(ValueType::Time.cell_count(), 3);
        assert_eq!(ValueType::Address.cell_count(), 3);
        assert_eq!(ValueType::AddressJp.cell_count(), 4);
    }

    #[test]
    fn test_header_cells_split() {
        let col = ColumnDefinition::new("name", ValueType::FullName).with_split();
        assert_eq!(col.header_cells(), ["name_first", "name_middle", "name_last"]);

        let col = ColumnDefinition::new("addr", ValueType::AddressJp).with_split();
        assert_eq!(
            col.header_cells(),
            ["addr_zip", "addr_pref", "addr_muni", "addr_other"]
        );
    }

    #[test]
    fn test_header_cells_split_ignored_for_scalar() {
        let col = ColumnDefinition::new("age", ValueType::Integer).with_split();
        assert_eq!(col.header_cells(), ["age"]);
    }
}
