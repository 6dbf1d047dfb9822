//! Error types for heal-db.
//!
//! `DatabaseError` is what a `GraphStore` backend raises. `GraphError` is what
//! `KnowledgeGraph` callers see: bad input is rejected before the store is
//! touched, and every store failure surfaces as `StoreUnavailable`.

use heal_core::errors::CoreError;
use thiserror::Error;

/// Errors from graph store operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema bootstrap failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A batch would break a graph invariant (reused event id, dangling edge).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The backend cannot serve requests right now.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors from `KnowledgeGraph` operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Malformed or missing required fields. Nothing was written.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The store could not complete the read or commit the write.
    /// Writes are atomic, so nothing was partially applied.
    #[error("Graph store unavailable: {0}")]
    StoreUnavailable(#[source] DatabaseError),
}

impl From<DatabaseError> for GraphError {
    fn from(err: DatabaseError) -> Self {
        Self::StoreUnavailable(err)
    }
}

impl From<CoreError> for GraphError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput(msg) => Self::InvalidInput(msg),
            CoreError::Other(e) => Self::StoreUnavailable(DatabaseError::Other(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_invalid_input_stays_invalid_input() {
        let err: GraphError = CoreError::missing("element_id").into();
        assert!(matches!(err, GraphError::InvalidInput(ref m) if m.contains("element_id")));
    }

    #[test]
    fn core_errors_map_to_exactly_two_classes() {
        let invalid: GraphError = CoreError::InvalidInput("bad locator".into()).into();
        assert!(matches!(invalid, GraphError::InvalidInput(ref m) if m == "bad locator"));

        let other: GraphError = CoreError::Other(anyhow::anyhow!("disk full")).into();
        assert!(matches!(other, GraphError::StoreUnavailable(DatabaseError::Other(_))));
    }

    #[test]
    fn database_errors_become_store_unavailable() {
        let err: GraphError = DatabaseError::Unavailable("down".into()).into();
        assert!(matches!(err, GraphError::StoreUnavailable(DatabaseError::Unavailable(_))));
        assert_eq!(err.to_string(), "Graph store unavailable: Store unavailable: down");
    }
}
