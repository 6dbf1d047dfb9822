//! In-memory graph store.
//!
//! Adjacency maps behind a tokio `RwLock`. A commit checks the whole batch
//! against the live graph first and only then applies it in place, so a
//! rejected batch leaves nothing behind. The availability switch lets tests
//! exercise store-failure paths.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use heal_core::entities::{Failure, HealingAction, TestRun};
use heal_core::enums::{NodeKind, Relation};
use heal_core::responses::GraphStats;
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    ElementSubgraph, EventNode, GraphBatch, GraphOp, GraphStore, HealingTrace, LocatorTrace,
    RunTrace,
};
use crate::error::DatabaseError;

#[derive(Debug, Default)]
struct Graph {
    next_seq: u64,
    /// Insertion position of every node, per kind.
    nodes: BTreeMap<NodeKind, HashMap<String, u64>>,
    runs: HashMap<String, TestRun>,
    failures: HashMap<String, Failure>,
    healings: HashMap<String, HealingAction>,
    edge_set: HashSet<(Relation, String, String)>,
    edge_count: u64,
    /// `(relation, from)` -> targets in link order.
    outgoing: HashMap<(Relation, String), Vec<String>>,
    /// `(relation, to)` -> sources in link order.
    incoming: HashMap<(Relation, String), Vec<String>>,
}

impl Graph {
    fn seq_of(&self, kind: NodeKind, key: &str) -> Option<u64> {
        self.nodes.get(&kind).and_then(|m| m.get(key)).copied()
    }

    fn insert_node(&mut self, kind: NodeKind, key: &str) {
        let seq = self.next_seq;
        let table = self.nodes.entry(kind).or_default();
        if !table.contains_key(key) {
            table.insert(key.to_string(), seq);
            self.next_seq += 1;
        }
    }

    fn targets(&self, relation: Relation, from: &str) -> &[String] {
        self.outgoing
            .get(&(relation, from.to_string()))
            .map_or(&[], Vec::as_slice)
    }

    fn sources(&self, relation: Relation, to: &str) -> &[String] {
        self.incoming
            .get(&(relation, to.to_string()))
            .map_or(&[], Vec::as_slice)
    }

    /// Reject the batch without touching the graph. Nodes created by earlier
    /// operations of the same batch count as present for later links.
    fn check(&self, ops: &[GraphOp]) -> Result<(), DatabaseError> {
        let mut pending: HashSet<(NodeKind, &str)> = HashSet::new();
        for op in ops {
            match op {
                GraphOp::UpsertNode(node) => {
                    if node.kind.is_event() {
                        return Err(DatabaseError::InvalidState(format!(
                            "{} nodes are events and cannot be upserted",
                            node.kind
                        )));
                    }
                    pending.insert((node.kind, node.key.as_str()));
                }
                GraphOp::CreateEvent(event) => {
                    let kind = event.kind();
                    if self.seq_of(kind, event.id()).is_some() || !pending.insert((kind, event.id())) {
                        return Err(DatabaseError::InvalidState(format!(
                            "{kind} id '{}' already exists",
                            event.id()
                        )));
                    }
                }
                GraphOp::Link { relation, from, to } => {
                    let (from_kind, to_kind) = relation.endpoints();
                    for (kind, key) in [(from_kind, from.as_str()), (to_kind, to.as_str())] {
                        if self.seq_of(kind, key).is_none() && !pending.contains(&(kind, key)) {
                            return Err(DatabaseError::InvalidState(format!(
                                "{relation} endpoint {kind} '{key}' does not exist"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Apply one operation that [`Self::check`] already accepted.
    fn apply(&mut self, op: GraphOp) {
        match op {
            GraphOp::UpsertNode(node) => self.insert_node(node.kind, &node.key),
            GraphOp::CreateEvent(event) => {
                self.insert_node(event.kind(), event.id());
                match event {
                    EventNode::TestRun(run) => {
                        self.runs.insert(run.id.clone(), run);
                    }
                    EventNode::Failure(failure) => {
                        self.failures.insert(failure.id.clone(), failure);
                    }
                    EventNode::HealingAction(action) => {
                        self.healings.insert(action.id.clone(), action);
                    }
                }
            }
            GraphOp::Link { relation, from, to } => {
                if self.edge_set.insert((relation, from.clone(), to.clone())) {
                    self.edge_count += 1;
                    self.outgoing
                        .entry((relation, from.clone()))
                        .or_default()
                        .push(to.clone());
                    self.incoming.entry((relation, to)).or_default().push(from);
                }
            }
        }
    }

    fn locator_traces(&self, element_id: &str) -> Result<Vec<LocatorTrace>, DatabaseError> {
        let mut locators = Vec::new();
        for value in self.targets(Relation::LocatedBy, element_id) {
            let seq = self.seq_of(NodeKind::Locator, value).ok_or_else(|| missing("locator", value))?;

            let mut runs = Vec::new();
            for test_id in self.targets(Relation::UsedIn, value) {
                for run_id in self.targets(Relation::ExecutedIn, test_id) {
                    let run = self.runs.get(run_id).ok_or_else(|| missing("test run", run_id))?;
                    let seq = self
                        .seq_of(NodeKind::TestRun, run_id)
                        .ok_or_else(|| missing("test run", run_id))?;
                    runs.push(RunTrace {
                        run_id: run.id.clone(),
                        seq,
                        result: run.result,
                        timestamp: run.timestamp,
                    });
                }
            }
            runs.sort_by_key(|r| r.seq);

            locators.push(LocatorTrace {
                value: value.clone(),
                seq,
                runs,
            });
        }
        locators.sort_by_key(|l| l.seq);
        Ok(locators)
    }

    fn healing_traces(&self, element_id: &str) -> Result<Vec<HealingTrace>, DatabaseError> {
        let mut healings = Vec::new();
        for failure_id in self.sources(Relation::OnElement, element_id) {
            for action_id in self.targets(Relation::HealedBy, failure_id) {
                let action = self
                    .healings
                    .get(action_id)
                    .ok_or_else(|| missing("healing action", action_id))?;
                let seq = self
                    .seq_of(NodeKind::HealingAction, action_id)
                    .ok_or_else(|| missing("healing action", action_id))?;
                healings.push(HealingTrace {
                    action_id: action.id.clone(),
                    failure_id: failure_id.clone(),
                    seq,
                    healing_type: action.healing_type.clone(),
                    timestamp: action.timestamp,
                    patch_id: self.targets(Relation::GeneratedPatch, action_id).first().cloned(),
                    prompt_id: self.targets(Relation::TriggeredBy, action_id).first().cloned(),
                });
            }
        }
        healings.sort_by_key(|h| h.seq);
        Ok(healings)
    }
}

fn missing(what: &str, key: &str) -> DatabaseError {
    DatabaseError::InvalidState(format!("edge points at unknown {what} '{key}'"))
}

#[derive(Debug)]
pub struct MemoryGraphStore {
    graph: RwLock<Graph>,
    available: AtomicBool,
}

impl Default for MemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGraphStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: RwLock::new(Graph::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Switch the store off (or back on). While off, every call fails with
    /// `DatabaseError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DatabaseError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DatabaseError::Unavailable("memory store is switched off".into()))
        }
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        self.check_available()
    }

    async fn commit(&self, batch: GraphBatch) -> Result<(), DatabaseError> {
        self.check_available()?;
        let op_count = batch.len();

        let mut graph = self.graph.write().await;
        graph.check(batch.ops())?;
        for op in batch {
            graph.apply(op);
        }

        debug!(ops = op_count, "graph batch committed (memory)");
        Ok(())
    }

    async fn traverse(&self, element_id: &str) -> Result<ElementSubgraph, DatabaseError> {
        self.check_available()?;
        let graph = self.graph.read().await;

        if graph.seq_of(NodeKind::Element, element_id).is_none() {
            return Ok(ElementSubgraph {
                element_id: element_id.to_string(),
                ..ElementSubgraph::default()
            });
        }

        Ok(ElementSubgraph {
            element_id: element_id.to_string(),
            locators: graph.locator_traces(element_id)?,
            healings: graph.healing_traces(element_id)?,
        })
    }

    async fn counts(&self) -> Result<GraphStats, DatabaseError> {
        self.check_available()?;
        let graph = self.graph.read().await;

        let mut stats = GraphStats::default();
        for kind in NodeKind::ALL {
            let count = graph.nodes.get(&kind).map_or(0, HashMap::len);
            stats.nodes.insert(kind, count as u64);
        }
        stats.edges = graph.edge_count;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn switched_off_store_rejects_everything() {
        let store = MemoryGraphStore::new();
        store.set_available(false);

        assert!(matches!(store.ensure_schema().await, Err(DatabaseError::Unavailable(_))));
        assert!(matches!(store.traverse("e").await, Err(DatabaseError::Unavailable(_))));
        assert!(matches!(
            store.commit(GraphBatch::new()).await,
            Err(DatabaseError::Unavailable(_))
        ));

        store.set_available(true);
        assert!(store.counts().await.is_ok());
    }

    #[tokio::test]
    async fn duplicate_links_are_merged() {
        let store = MemoryGraphStore::new();
        let mut batch = GraphBatch::new();
        batch
            .upsert(NodeKind::Element, "e")
            .upsert(NodeKind::Locator, "//a")
            .link(Relation::LocatedBy, "e", "//a")
            .link(Relation::LocatedBy, "e", "//a");
        store.commit(batch).await.unwrap();

        let stats = store.counts().await.unwrap();
        assert_eq!(stats.edges, 1);
        assert_eq!(store.traverse("e").await.unwrap().locators.len(), 1);
    }

    #[tokio::test]
    async fn failed_batch_is_not_applied() {
        let store = MemoryGraphStore::new();
        let mut batch = GraphBatch::new();
        batch
            .upsert(NodeKind::Element, "e")
            .link(Relation::LocatedBy, "e", "//nowhere");
        assert!(store.commit(batch).await.is_err());
        assert_eq!(store.counts().await.unwrap().count(NodeKind::Element), 0);
    }

    #[tokio::test]
    async fn rejected_batch_does_not_advance_the_sequence() {
        let store = MemoryGraphStore::new();
        let mut bad = GraphBatch::new();
        bad.upsert(NodeKind::Element, "e")
            .upsert(NodeKind::Locator, "//a")
            .link(Relation::LocatedBy, "e", "//a")
            .link(Relation::UsedIn, "//a", "missing-test");
        assert!(store.commit(bad).await.is_err());

        {
            let graph = store.graph.read().await;
            assert_eq!(graph.next_seq, 0);
            assert_eq!(graph.edge_count, 0);
            assert!(graph.outgoing.is_empty());
        }

        let mut good = GraphBatch::new();
        good.upsert(NodeKind::Element, "e");
        store.commit(good).await.unwrap();
        assert_eq!(store.graph.read().await.seq_of(NodeKind::Element, "e"), Some(0));
    }

    #[tokio::test]
    async fn links_may_target_nodes_created_earlier_in_the_batch() {
        let store = MemoryGraphStore::new();
        let mut batch = GraphBatch::new();
        batch
            .upsert(NodeKind::Element, "e")
            .upsert(NodeKind::Locator, "//a")
            .link(Relation::LocatedBy, "e", "//a");
        store.commit(batch).await.unwrap();
        assert_eq!(store.counts().await.unwrap().edges, 1);
    }
}
