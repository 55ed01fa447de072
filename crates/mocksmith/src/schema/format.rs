//! Value formatter: structured column values to display/CSV cells.
//!
//! Pure companion to the compiler. A column value renders either collapsed
//! (one human-readable cell, locale-configurable) or split (one cell per
//! sub-field in declaration order, locale-independent).

use serde_json::Value;

use super::column::{ColumnDefinition, ValueType};

/// Field order for collapsed date rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateOrder {
    Dmy,
    #[default]
    Ymd,
    Mdy,
}

impl DateOrder {
    fn keys(&self) -> [&'static str; 3] {
        match self {
            DateOrder::Dmy => ["day", "month", "year"],
            DateOrder::Ymd => ["year", "month", "day"],
            DateOrder::Mdy => ["month", "day", "year"],
        }
    }
}

/// Locale configuration for collapsed rendering.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    pub date_order: DateOrder,
    pub date_separator: String,
    pub time_separator: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            date_order: DateOrder::default(),
            date_separator: "/".to_string(),
            time_separator: ":".to_string(),
        }
    }
}

/// Render one column value into cells.
///
/// `csv` selects machine-readable rendering: bare digits, `TRUE`/`FALSE`
/// booleans, and space instead of newline inside collapsed addresses.
/// Null or absent input yields empty cells (one collapsed, sub-field count
/// split). Never fails.
pub fn format_cells(
    definition: &ColumnDefinition,
    value: Option<&Value>,
    config: &FormatConfig,
    csv: bool,
) -> Vec<String> {
    let split = definition.split && definition.value_type.fields().is_some();
    let value = match value {
        Some(v) if !v.is_null() => v,
        _ => {
            let cells = if split {
                definition.value_type.cell_count()
            } else {
                1
            };
            return vec![String::new(); cells];
        }
    };

    match definition.value_type {
        ValueType::Text | ValueType::Enum | ValueType::Gender => vec![scalar_text(value)],
        ValueType::Number | ValueType::Integer => vec![if csv {
            scalar_text(value)
        } else {
            group_thousands(&scalar_text(value))
        }],
        ValueType::Boolean => {
            let b = value.as_bool().unwrap_or(false);
            vec![match (csv, b) {
                (true, true) => "TRUE".to_string(),
                (true, false) => "FALSE".to_string(),
                (false, true) => "Yes".to_string(),
                (false, false) => "No".to_string(),
            }]
        }
        ValueType::FullName
        | ValueType::Date
        | ValueType::Time
        | ValueType::Address
        | ValueType::AddressJp => {
            if split {
                split_cells(definition.value_type, value)
            } else {
                vec![collapse(definition.value_type, value, config, csv)]
            }
        }
    }
}

/// One cell per sub-field, in the sub-field's fixed declaration order.
fn split_cells(value_type: ValueType, value: &Value) -> Vec<String> {
    let fields = value_type.fields().expect("structured type");
    fields
        .iter()
        .map(|f| field_text(value, f.name))
        .collect()
}

/// Collapse a structured value into one human-readable cell.
fn collapse(value_type: ValueType, value: &Value, config: &FormatConfig, csv: bool) -> String {
    let line_break = if csv { " " } else { "\n" };
    match value_type {
        ValueType::FullName => ["first", "middle", "last"]
            .iter()
            .map(|k| field_text(value, k))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        ValueType::Date => config
            .date_order
            .keys()
            .iter()
            .map(|k| field_text(value, k))
            .collect::<Vec<_>>()
            .join(&config.date_separator),
        ValueType::Time => ["hour", "minute", "second"]
            .iter()
            .map(|k| field_text(value, k))
            .collect::<Vec<_>>()
            .join(&config.time_separator),
        ValueType::Address => format!(
            "{}{}{} {}",
            field_text(value, "country"),
            line_break,
            field_text(value, "address"),
            field_text(value, "zipCode"),
        ),
        ValueType::AddressJp => format!(
            "{}{}{}{}{}",
            field_text(value, "zipCode"),
            line_break,
            field_text(value, "prefecture"),
            field_text(value, "municipality"),
            field_text(value, "others"),
        ),
        _ => scalar_text(value),
    }
}

/// Bare text of a scalar JSON value (no quotes around strings).
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Text of one sub-field, empty for null/missing.
fn field_text(value: &Value, key: &str) -> String {
    value.get(key).map(scalar_text).unwrap_or_default()
}

/// Insert thousands separators into the integer part of a rendered number.
fn group_thousands(text: &str) -> String {
    let (sign, rest) = text.strip_prefix('-').map_or(("", text), |r| ("-", r));
    let (int_part, tail) = match rest.find(['.', 'e', 'E']) {
        Some(pos) => rest.split_at(pos),
        None => (rest, ""),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}{tail}")
}
