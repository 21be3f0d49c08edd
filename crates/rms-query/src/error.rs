//! Query builder error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    /// The operation needs a JSON key path but none was given.
    #[error("JSON query on column '{column}' needs at least one key for {operation}")]
    MissingKeys {
        column: String,
        operation: &'static str,
    },

    /// A value could not be rendered into the SQL text.
    #[error("Failed to encode JSON literal: {0}")]
    Encode(#[from] serde_json::Error),
}
