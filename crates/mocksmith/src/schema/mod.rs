//! Column schema: the value-type vocabulary, the compiler that turns column
//! definitions into an output-shape constraint + validator, and the value
//! formatter for display/CSV rendering.

mod column;
mod compile;
mod format;

pub use column::{ColumnDefinition, FieldKind, FieldSpec, ValueType};
pub use compile::{ColumnShape, CompiledColumn, CompiledSchema};
pub use format::{format_cells, DateOrder, FormatConfig};
