//! Cross-cutting error types for healgraph.
//!
//! Storage errors (`DatabaseError`, `GraphError`) live in `heal-db` and the
//! decision-cycle errors (`EngineError`) in `heal-engine`. All of them can
//! carry a `CoreError` raised while validating input.

use thiserror::Error;

/// Errors that can be raised by any healgraph crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required field is missing or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Shorthand for an `InvalidInput` naming the offending field.
    #[must_use]
    pub fn missing(field: &str) -> Self {
        Self::InvalidInput(format!("'{field}' is required and must not be empty"))
    }
}
