//! Error types for the Mocksmith library.

use thiserror::Error;

/// Main error type for Mocksmith operations.
#[derive(Debug, Error)]
pub enum MocksmithError {
    /// An `enum` column was declared without comma-separated values in its
    /// description.
    #[error("column '{column}': enum type requires comma-separated values in the description")]
    MissingEnumValues { column: String },

    /// A column definition named a value type outside the closed vocabulary.
    #[error("unknown column type: {type_name}")]
    UnknownType { type_name: String },

    /// The remote stream failed mid-flight, or the finalized document did
    /// not validate against the compiled schema.
    #[error("stream error: {0}")]
    Stream(String),

    /// Non-2xx or malformed response on the non-streaming path.
    #[error("provider error{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Provider {
        status: Option<u16>,
        message: String,
    },

    /// Configuration error (missing API key, bad client setup).
    #[error("configuration error: {0}")]
    Config(String),

    /// CSV writing error during table export.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for Mocksmith operations.
pub type Result<T> = std::result::Result<T, MocksmithError>;
