//! Healing strategy ranking and healing history.

use heal_core::responses::{HealingHistoryEntry, HealingStrategy};
use tracing::debug;

use crate::error::GraphError;
use crate::ranking;
use crate::service::KnowledgeGraph;

impl KnowledgeGraph {
    /// Healing types applied to failures on this element, most frequent first.
    /// An empty list means the element has no healing history.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank element id, `StoreUnavailable` if the read fails.
    pub async fn ranked_healing_strategies(
        &self,
        element_id: &str,
    ) -> Result<Vec<HealingStrategy>, GraphError> {
        let graph = self.subgraph(element_id).await?;
        let ranked = ranking::ranked_strategies(&graph);
        debug!(element_id, strategies = ranked.len(), "healing strategies ranked");
        Ok(ranked)
    }

    /// Healing actions that produced a patch, newest first. Actions recorded
    /// without a patch do not appear here.
    ///
    /// Like [`Self::locator_history`], the result is a finished snapshot that
    /// can be re-read at any time.
    ///
    /// # Errors
    ///
    /// Same as [`Self::ranked_healing_strategies`].
    pub async fn healing_history(
        &self,
        element_id: &str,
    ) -> Result<Vec<HealingHistoryEntry>, GraphError> {
        let graph = self.subgraph(element_id).await?;
        Ok(ranking::healing_history(&graph))
    }
}
