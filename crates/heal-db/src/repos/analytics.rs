//! Element analytics and graph-wide statistics.

use heal_core::responses::{ElementAnalytics, GraphStats};

use crate::error::GraphError;
use crate::ranking;
use crate::service::KnowledgeGraph;

impl KnowledgeGraph {
    /// Locator, run and failure counts for one element. A never-seen element
    /// yields zeros rather than an error.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank element id, `StoreUnavailable` if the read fails.
    pub async fn element_analytics(&self, element_id: &str) -> Result<ElementAnalytics, GraphError> {
        let graph = self.subgraph(element_id).await?;
        Ok(ranking::element_analytics(&graph))
    }

    /// Node counts per kind and total edges.
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` if the read fails.
    pub async fn stats(&self) -> Result<GraphStats, GraphError> {
        Ok(self.store().counts().await?)
    }
}
