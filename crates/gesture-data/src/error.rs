//! Data Loading Error Types

use thiserror::Error;

/// Errors while loading gesture sample tables
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// Source missing, unreadable, or lacking a required column
    #[error("data unavailable for '{source_name}': {reason}")]
    DataUnavailable { source_name: String, reason: String },

    /// A required field could not be read as a finite number
    #[error("malformed row at line {line} of '{source_name}': column {column} has value {value:?}")]
    MalformedRow {
        source_name: String,
        line: u64,
        column: String,
        value: String,
    },

    /// Gesture list rejected
    #[error("invalid gesture set: {0}")]
    InvalidGestureSet(String),
}

impl DataError {
    /// Build an unavailable-source error
    pub fn unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}
