use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldbookError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    /// Input that could not be parsed into the expected type (numbers, dates).
    #[error("Could not parse {field}: {reason}")]
    InputParse { field: String, reason: String },

    #[error("CSV not found at: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("CSV is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Malformed row at line {line}: {field} — {reason}")]
    MalformedRow {
        line: u64,
        field: String,
        reason: String,
    },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FieldbookError {
    fn from(e: serde_json::Error) -> Self {
        FieldbookError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "maintenance")]
impl From<csv::Error> for FieldbookError {
    fn from(e: csv::Error) -> Self {
        FieldbookError::Csv(e.to_string())
    }
}
