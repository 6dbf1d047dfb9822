//! # heal-db
//!
//! Graph storage and knowledge graph queries for healgraph.
//!
//! The `GraphStore` trait is the storage seam, with a libSQL backend for
//! persistent graphs and an in-memory backend for tests. `KnowledgeGraph`
//! layers the domain operations on top: recording runs, ranking locators and
//! healing strategies, and the history and analytics views.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29).

pub mod error;
pub mod helpers;
pub mod ranking;
mod repos;
pub mod service;
pub mod store;
mod test_support;

pub use error::{DatabaseError, GraphError};
pub use service::KnowledgeGraph;
pub use store::{GraphStore, LibsqlGraphStore, MemoryGraphStore};

#[cfg(test)]
mod tests {
    use heal_core::enums::{NodeKind, RunResult};
    use heal_core::requests::RecordRunRequest;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{libsql_graph, memory_graph, record_healed};

    #[tokio::test]
    async fn record_then_rank_strategies() {
        let kg = libsql_graph().await;
        record_healed(&kg, "wait").await;
        record_healed(&kg, "xpath").await;
        record_healed(&kg, "xpath").await;

        let ranked = kg.ranked_healing_strategies("elem42").await.unwrap();
        let order: Vec<(&str, u64)> = ranked
            .iter()
            .map(|s| (s.healing_type.as_str(), s.occurrences))
            .collect();
        assert_eq!(order, vec![("xpath", 2), ("wait", 1)]);
    }

    #[tokio::test]
    async fn blank_element_is_rejected_before_the_store() {
        let (kg, store) = memory_graph();
        store.set_available(false);

        let err = kg.ranked_locators("  ").await.unwrap_err();
        assert!(matches!(err, GraphError::InvalidInput(_)), "{err}");
    }

    #[tokio::test]
    async fn invalid_result_writes_nothing() {
        let (kg, _store) = memory_graph();
        let mut req = RecordRunRequest::new("t", "e", "l", RunResult::Pass);
        req.result = "flaky".into();

        assert!(matches!(kg.record_run(&req).await, Err(GraphError::InvalidInput(_))));
        assert_eq!(kg.stats().await.unwrap().count(NodeKind::TestRun), 0);
    }

    #[tokio::test]
    async fn unavailable_store_surfaces_as_store_unavailable() {
        let (kg, store) = memory_graph();
        store.set_available(false);

        let req = RecordRunRequest::new("t", "e", "l", RunResult::Pass);
        assert!(matches!(
            kg.record_run(&req).await,
            Err(GraphError::StoreUnavailable(DatabaseError::Unavailable(_)))
        ));
        assert!(matches!(
            kg.ranked_healing_strategies("e").await,
            Err(GraphError::StoreUnavailable(_))
        ));
    }
}
