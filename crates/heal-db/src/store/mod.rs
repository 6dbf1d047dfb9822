//! The graph store seam.
//!
//! A backend only needs three capabilities: apply a batch of upserts, event
//! creations and links atomically; walk the subgraph around one element; and
//! report node counts. Ranking and aggregation over the walked subgraph live
//! in [`crate::ranking`], so every backend answers queries identically.

pub mod memory;
pub mod sql;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use heal_core::entities::{Failure, HealingAction, TestRun};
use heal_core::enums::{NodeKind, Relation, RunResult};
use heal_core::responses::GraphStats;

use crate::error::DatabaseError;

pub use memory::MemoryGraphStore;
pub use sql::LibsqlGraphStore;

/// Persistent or in-memory home of the knowledge graph.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Create node tables and uniqueness constraints if they are missing.
    /// Safe to call any number of times.
    async fn ensure_schema(&self) -> Result<(), DatabaseError>;

    /// Apply every operation in `batch`, or none of them.
    ///
    /// Reference nodes and edges are created if absent and matched otherwise.
    /// Event nodes must carry a fresh id; a reused id fails the whole batch,
    /// as does a link whose endpoints do not exist when it is reached.
    /// Operations are applied in batch order.
    async fn commit(&self, batch: GraphBatch) -> Result<(), DatabaseError>;

    /// Walk everything the knowledge graph queries need for one element.
    async fn traverse(&self, element_id: &str) -> Result<ElementSubgraph, DatabaseError>;

    /// Node count per kind plus the total edge count.
    async fn counts(&self) -> Result<GraphStats, DatabaseError>;
}

/// Identity of a reference node (element, locator, test case, patch, prompt).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub kind: NodeKind,
    pub key: String,
}

/// A freshly generated event node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventNode {
    TestRun(TestRun),
    Failure(Failure),
    HealingAction(HealingAction),
}

impl EventNode {
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::TestRun(_) => NodeKind::TestRun,
            Self::Failure(_) => NodeKind::Failure,
            Self::HealingAction(_) => NodeKind::HealingAction,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::TestRun(run) => &run.id,
            Self::Failure(failure) => &failure.id,
            Self::HealingAction(action) => &action.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphOp {
    UpsertNode(NodeKey),
    CreateEvent(EventNode),
    Link {
        relation: Relation,
        from: String,
        to: String,
    },
}

/// Ordered list of operations committed as one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphBatch {
    ops: Vec<GraphOp>,
}

impl GraphBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, kind: NodeKind, key: impl Into<String>) -> &mut Self {
        self.ops.push(GraphOp::UpsertNode(NodeKey {
            kind,
            key: key.into(),
        }));
        self
    }

    pub fn event(&mut self, node: EventNode) -> &mut Self {
        self.ops.push(GraphOp::CreateEvent(node));
        self
    }

    pub fn link(
        &mut self,
        relation: Relation,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> &mut Self {
        self.ops.push(GraphOp::Link {
            relation,
            from: from.into(),
            to: to.into(),
        });
        self
    }

    #[must_use]
    pub fn ops(&self) -> &[GraphOp] {
        &self.ops
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl IntoIterator for GraphBatch {
    type Item = GraphOp;
    type IntoIter = std::vec::IntoIter<GraphOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

/// Everything reachable from one element that the queries aggregate over.
/// An element the store has never seen walks to an empty subgraph.
///
/// `seq` values are store-assigned insertion positions. They only compare
/// meaningfully within the same node kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSubgraph {
    pub element_id: String,
    /// `LOCATED_BY` targets in locator insertion order.
    pub locators: Vec<LocatorTrace>,
    /// Healing actions on failures `ON_ELEMENT` this element, in insertion order.
    pub healings: Vec<HealingTrace>,
}

/// A locator and the runs reachable through `USED_IN -> EXECUTED_IN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorTrace {
    pub value: String,
    pub seq: u64,
    pub runs: Vec<RunTrace>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTrace {
    pub run_id: String,
    pub seq: u64,
    pub result: RunResult,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealingTrace {
    pub action_id: String,
    pub failure_id: String,
    pub seq: u64,
    pub healing_type: String,
    pub timestamp: DateTime<Utc>,
    pub patch_id: Option<String>,
    pub prompt_id: Option<String>,
}
