//! Shared test utilities for heal-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use std::sync::Arc;

    use heal_core::enums::RunResult;
    use heal_core::requests::RecordRunRequest;

    use crate::service::KnowledgeGraph;
    use crate::store::{LibsqlGraphStore, MemoryGraphStore};

    /// Knowledge graph over an in-memory libSQL database.
    pub async fn libsql_graph() -> KnowledgeGraph {
        let store = LibsqlGraphStore::open_in_memory().await.unwrap();
        KnowledgeGraph::new(Arc::new(store))
    }

    /// Knowledge graph over the memory store, plus a handle to switch it off.
    pub fn memory_graph() -> (KnowledgeGraph, Arc<MemoryGraphStore>) {
        let store = Arc::new(MemoryGraphStore::new());
        (KnowledgeGraph::new(store.clone()), store)
    }

    /// Record a failing run with a healing type on `elem42`.
    pub async fn record_healed(kg: &KnowledgeGraph, healing: &str) {
        kg.record_run(
            &RecordRunRequest::new("test1", "elem42", "//button[@id='submit']", RunResult::Fail)
                .healing(healing),
        )
        .await
        .unwrap();
    }
}
