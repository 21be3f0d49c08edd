//! Apply error types.

use rms_core::errors::CoreError;
use rms_core::responses::codes;
use thiserror::Error;

/// Errors from validating, ordering, or serving an apply request.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The request is malformed or self-contradictory.
    #[error("Invalid apply request: {0}")]
    Validation(String),

    /// The request holds more groups than allowed.
    #[error("Too many apply groups: {count} (max {max})")]
    TooManyDetails { count: usize, max: usize },

    /// No set of pool machines satisfies one group.
    #[error("Insufficient resource for group '{group}':\n{message}")]
    Insufficient { group: String, message: String },

    /// Another apply holds the lock for the same key.
    #[error("Apply lock '{key}' is busy{}", holder_suffix(.holder))]
    LockBusy { key: String, holder: Option<u32> },

    /// A pool host was in a state the apply cannot move it out of.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Pool or operation log I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Pool file could not be (de)serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn holder_suffix(holder: &Option<u32>) -> String {
    holder.map_or_else(String::new, |pid| format!(" (held by pid {pid})"))
}

impl ApplyError {
    /// Envelope code reported for this error.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::TooManyDetails { .. } => codes::VALIDATION,
            Self::Insufficient { .. } => codes::INSUFFICIENT_RESOURCE,
            Self::LockBusy { .. } => codes::LOCK_BUSY,
            Self::Core(_) | Self::Io(_) | Self::Json(_) | Self::Other(_) => codes::INTERNAL,
        }
    }
}
