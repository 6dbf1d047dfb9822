//! Error types for the healing decision engine.

use heal_db::{DatabaseError, GraphError};
use thiserror::Error;

/// Why the suggestion source could not produce a locator.
#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("suggestion timed out after {after_secs}s")]
    Timeout { after_secs: u64 },

    /// Transport failure or non-success HTTP status.
    #[error("suggestion request failed: {0}")]
    Request(String),

    /// The provider answered, but not with a usable locator.
    #[error("malformed suggestion response: {0}")]
    MalformedResponse(String),

    #[error("no suggestion provider is configured (set [suggester] api_base_url and model)")]
    NotConfigured,
}

/// Why the rerun step could not produce a pass/fail result.
#[derive(Debug, Error)]
pub enum RerunError {
    #[error("failed to start rerun command '{program}': {reason}")]
    Spawn { program: String, reason: String },

    #[error("rerun timed out after {after_secs}s")]
    Timeout { after_secs: u64 },

    #[error("rerun command is empty")]
    EmptyCommand,

    #[error("random source unavailable: {0}")]
    Random(String),
}

/// Coarse grouping used by transports to pick a status or exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller sent something malformed.
    Client,
    /// The graph store failed; the caller may retry the whole operation.
    Store,
    /// An external collaborator (suggester, test runner) failed.
    Dependency,
}

/// Errors from one auto-heal cycle. Nothing is silently recovered.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Graph store unavailable: {0}")]
    StoreUnavailable(#[source] DatabaseError),

    #[error("Suggestion unavailable: {0}")]
    SuggestionUnavailable(#[from] SuggestionError),

    #[error("Rerun unavailable: {0}")]
    RerunUnavailable(#[from] RerunError),
}

impl EngineError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidInput(_) => ErrorClass::Client,
            Self::StoreUnavailable(_) => ErrorClass::Store,
            Self::SuggestionUnavailable(_) | Self::RerunUnavailable(_) => ErrorClass::Dependency,
        }
    }
}

impl From<GraphError> for EngineError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::InvalidInput(msg) => Self::InvalidInput(msg),
            GraphError::StoreUnavailable(e) => Self::StoreUnavailable(e),
        }
    }
}

impl From<heal_core::errors::CoreError> for EngineError {
    fn from(err: heal_core::errors::CoreError) -> Self {
        GraphError::from(err).into()
    }
}
