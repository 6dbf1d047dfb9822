//! Locator ranking and history.

use heal_core::responses::{LocatorHistoryEntry, LocatorRank};
use tracing::debug;

use crate::error::GraphError;
use crate::ranking;
use crate::service::KnowledgeGraph;

impl KnowledgeGraph {
    /// All locators of an element that have at least one run, best first.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank element id, `StoreUnavailable` if the read fails.
    pub async fn ranked_locators(&self, element_id: &str) -> Result<Vec<LocatorRank>, GraphError> {
        let graph = self.subgraph(element_id).await?;
        let ranked = ranking::ranked_locators(&graph);
        debug!(element_id, candidates = ranked.len(), "locators ranked");
        Ok(ranked)
    }

    /// The single best locator, or `None` when no locator has been run.
    ///
    /// # Errors
    ///
    /// Same as [`Self::ranked_locators`].
    pub async fn best_locator(&self, element_id: &str) -> Result<Option<LocatorRank>, GraphError> {
        Ok(self.ranked_locators(element_id).await?.into_iter().next())
    }

    /// Every run observed through the element's locators, newest first.
    ///
    /// The history is read in one pass and returned whole. It is a snapshot:
    /// calling again re-reads the store and sees runs recorded since.
    ///
    /// # Errors
    ///
    /// Same as [`Self::ranked_locators`].
    pub async fn locator_history(
        &self,
        element_id: &str,
    ) -> Result<Vec<LocatorHistoryEntry>, GraphError> {
        let graph = self.subgraph(element_id).await?;
        Ok(ranking::locator_history(&graph))
    }
}
