//! The knowledge graph accessor.
//!
//! `KnowledgeGraph` wraps a shared `GraphStore`. It keeps no cached graph
//! state between calls; every query walks the store afresh. Repo methods are
//! implemented as `impl KnowledgeGraph` blocks under `repos/`.

use std::sync::Arc;

use heal_core::errors::CoreError;
use tracing::info;

use crate::error::GraphError;
use crate::store::{ElementSubgraph, GraphStore, LibsqlGraphStore, MemoryGraphStore};

#[derive(Clone)]
pub struct KnowledgeGraph {
    store: Arc<dyn GraphStore>,
}

impl KnowledgeGraph {
    #[must_use]
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Open (or create) a persistent graph at `path`. `":memory:"` gives a
    /// throwaway libSQL database.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::StoreUnavailable` if the database cannot be opened
    /// or its schema cannot be bootstrapped.
    pub async fn open_local(path: &str) -> Result<Self, GraphError> {
        let store = LibsqlGraphStore::open_local(path).await?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Graph backed by the in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryGraphStore::new()))
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    /// Bootstrap node tables and uniqueness constraints. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::StoreUnavailable` if the store rejects the schema.
    pub async fn ensure_schema(&self) -> Result<(), GraphError> {
        self.store.ensure_schema().await?;
        info!("knowledge graph schema ensured");
        Ok(())
    }

    /// Validate an element id and walk its subgraph.
    pub(crate) async fn subgraph(&self, element_id: &str) -> Result<ElementSubgraph, GraphError> {
        if element_id.trim().is_empty() {
            return Err(CoreError::missing("element_id").into());
        }
        Ok(self.store.traverse(element_id).await?)
    }
}

impl std::fmt::Debug for KnowledgeGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeGraph").finish_non_exhaustive()
    }
}
