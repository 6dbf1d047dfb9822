//! libSQL-backed graph store.
//!
//! Nodes live in one table per label and edges in a single `edges` table keyed
//! by `(relation, from_key, to_key)`. Every commit runs inside one libSQL
//! transaction behind an exclusive gate; traversals take the gate shared, so
//! readers on the shared connection never observe a half-applied batch.

use std::collections::HashMap;

use async_trait::async_trait;
use heal_core::enums::{NodeKind, Relation};
use heal_core::responses::GraphStats;
use libsql::{Builder, Connection};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{
    ElementSubgraph, EventNode, GraphBatch, GraphOp, GraphStore, HealingTrace, LocatorTrace,
    NodeKey, RunTrace,
};
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, get_u64, node_table, parse_datetime, parse_enum};

/// Node tables, uniqueness constraints, and the edge table.
const MIGRATION_001: &str = include_str!("../../migrations/001_graph.sql");

pub struct LibsqlGraphStore {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: Connection,
    gate: RwLock<()>,
}

impl LibsqlGraphStore {
    /// Open a local database file, or `":memory:"`, and bootstrap the schema.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the schema
    /// cannot be created.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let store = Self {
            db,
            conn,
            gate: RwLock::new(()),
        };
        store.ensure_schema().await?;
        debug!(path, "graph store opened");
        Ok(store)
    }

    /// # Errors
    ///
    /// Same as [`Self::open_local`].
    pub async fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::open_local(":memory:").await
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl GraphStore for LibsqlGraphStore {
    async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        let _guard = self.gate.write().await;
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_graph: {e}")))?;
        info!("graph schema ready");
        Ok(())
    }

    async fn commit(&self, batch: GraphBatch) -> Result<(), DatabaseError> {
        let op_count = batch.len();
        let _guard = self.gate.write().await;
        let tx = self.conn.transaction().await?;

        if let Err(err) = apply_ops(&tx, batch).await {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "rollback after failed batch also failed");
            }
            return Err(err);
        }

        tx.commit().await?;
        debug!(ops = op_count, "graph batch committed");
        Ok(())
    }

    async fn traverse(&self, element_id: &str) -> Result<ElementSubgraph, DatabaseError> {
        let _guard = self.gate.read().await;

        if !node_exists(&self.conn, NodeKind::Element, element_id).await? {
            return Ok(ElementSubgraph {
                element_id: element_id.to_string(),
                ..ElementSubgraph::default()
            });
        }

        let locators = locator_traces(&self.conn, element_id).await?;
        let healings = healing_traces(&self.conn, element_id).await?;

        Ok(ElementSubgraph {
            element_id: element_id.to_string(),
            locators,
            healings,
        })
    }

    async fn counts(&self) -> Result<GraphStats, DatabaseError> {
        let _guard = self.gate.read().await;
        let mut stats = GraphStats::default();

        for kind in NodeKind::ALL {
            let (table, _) = node_table(kind);
            let count = count_rows(&self.conn, table).await?;
            stats.nodes.insert(kind, count);
        }
        stats.edges = count_rows(&self.conn, "edges").await?;

        Ok(stats)
    }
}

async fn apply_ops(conn: &Connection, batch: GraphBatch) -> Result<(), DatabaseError> {
    for op in batch {
        match op {
            GraphOp::UpsertNode(node) => upsert_node(conn, &node).await?,
            GraphOp::CreateEvent(event) => create_event(conn, &event).await?,
            GraphOp::Link { relation, from, to } => link(conn, relation, &from, &to).await?,
        }
    }
    Ok(())
}

async fn upsert_node(conn: &Connection, node: &NodeKey) -> Result<(), DatabaseError> {
    if node.kind.is_event() {
        return Err(DatabaseError::InvalidState(format!(
            "{} nodes are events and cannot be upserted",
            node.kind
        )));
    }
    let (table, column) = node_table(node.kind);
    conn.execute(
        &format!("INSERT INTO {table} ({column}) VALUES (?1) ON CONFLICT({column}) DO NOTHING"),
        [node.key.as_str()],
    )
    .await?;
    Ok(())
}

async fn create_event(conn: &Connection, event: &EventNode) -> Result<(), DatabaseError> {
    if node_exists(conn, event.kind(), event.id()).await? {
        return Err(DatabaseError::InvalidState(format!(
            "{} id '{}' already exists",
            event.kind(),
            event.id()
        )));
    }

    match event {
        EventNode::TestRun(run) => {
            conn.execute(
                "INSERT INTO test_runs (id, test_id, result, timestamp) VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    run.id.as_str(),
                    run.test_id.as_str(),
                    run.result.as_str(),
                    run.timestamp.to_rfc3339()
                ],
            )
            .await?;
        }
        EventNode::Failure(failure) => {
            conn.execute(
                "INSERT INTO failures (id, run_id, element_id, reason, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    failure.id.as_str(),
                    failure.run_id.as_str(),
                    failure.element_id.as_str(),
                    failure.reason.as_deref(),
                    failure.timestamp.to_rfc3339()
                ],
            )
            .await?;
        }
        EventNode::HealingAction(action) => {
            conn.execute(
                "INSERT INTO healing_actions (id, failure_id, healing_type, timestamp)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    action.id.as_str(),
                    action.failure_id.as_str(),
                    action.healing_type.as_str(),
                    action.timestamp.to_rfc3339()
                ],
            )
            .await?;
        }
    }
    Ok(())
}

async fn link(
    conn: &Connection,
    relation: Relation,
    from: &str,
    to: &str,
) -> Result<(), DatabaseError> {
    let (from_kind, to_kind) = relation.endpoints();
    for (kind, key) in [(from_kind, from), (to_kind, to)] {
        if !node_exists(conn, kind, key).await? {
            return Err(DatabaseError::InvalidState(format!(
                "{relation} endpoint {kind} '{key}' does not exist"
            )));
        }
    }

    conn.execute(
        "INSERT INTO edges (relation, from_key, to_key) VALUES (?1, ?2, ?3)
         ON CONFLICT(relation, from_key, to_key) DO NOTHING",
        libsql::params![relation.as_str(), from, to],
    )
    .await?;
    Ok(())
}

async fn node_exists(conn: &Connection, kind: NodeKind, key: &str) -> Result<bool, DatabaseError> {
    let (table, column) = node_table(kind);
    let mut rows = conn
        .query(&format!("SELECT 1 FROM {table} WHERE {column} = ?1"), [key])
        .await?;
    Ok(rows.next().await?.is_some())
}

async fn count_rows(conn: &Connection, table: &str) -> Result<u64, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT count(*) FROM {table}"), ())
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    get_u64(&row, 0)
}

async fn locator_traces(
    conn: &Connection,
    element_id: &str,
) -> Result<Vec<LocatorTrace>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT l.value, l.seq
             FROM edges lb
             JOIN locators l ON l.value = lb.to_key
             WHERE lb.relation = 'LOCATED_BY' AND lb.from_key = ?1
             ORDER BY l.seq",
            [element_id],
        )
        .await?;

    let mut locators = Vec::new();
    let mut positions = HashMap::new();
    while let Some(row) = rows.next().await? {
        let value = row.get::<String>(0)?;
        positions.insert(value.clone(), locators.len());
        locators.push(LocatorTrace {
            value,
            seq: get_u64(&row, 1)?,
            runs: Vec::new(),
        });
    }

    let mut rows = conn
        .query(
            "SELECT lb.to_key, r.id, r.seq, r.result, r.timestamp
             FROM edges lb
             JOIN edges ui ON ui.relation = 'USED_IN' AND ui.from_key = lb.to_key
             JOIN edges ei ON ei.relation = 'EXECUTED_IN' AND ei.from_key = ui.to_key
             JOIN test_runs r ON r.id = ei.to_key
             WHERE lb.relation = 'LOCATED_BY' AND lb.from_key = ?1
             ORDER BY r.seq",
            [element_id],
        )
        .await?;

    while let Some(row) = rows.next().await? {
        let locator = row.get::<String>(0)?;
        let Some(&idx) = positions.get(&locator) else {
            return Err(DatabaseError::InvalidState(format!(
                "run reached through unknown locator '{locator}'"
            )));
        };
        locators[idx].runs.push(RunTrace {
            run_id: row.get::<String>(1)?,
            seq: get_u64(&row, 2)?,
            result: parse_enum(&row.get::<String>(3)?)?,
            timestamp: parse_datetime(&row.get::<String>(4)?)?,
        });
    }

    Ok(locators)
}

async fn healing_traces(
    conn: &Connection,
    element_id: &str,
) -> Result<Vec<HealingTrace>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT h.id, hb.from_key, h.seq, h.healing_type, h.timestamp,
                    (SELECT gp.to_key FROM edges gp
                     WHERE gp.relation = 'GENERATED_PATCH' AND gp.from_key = h.id
                     ORDER BY gp.seq LIMIT 1),
                    (SELECT tb.to_key FROM edges tb
                     WHERE tb.relation = 'TRIGGERED_BY' AND tb.from_key = h.id
                     ORDER BY tb.seq LIMIT 1)
             FROM edges oe
             JOIN edges hb ON hb.relation = 'HEALED_BY' AND hb.from_key = oe.from_key
             JOIN healing_actions h ON h.id = hb.to_key
             WHERE oe.relation = 'ON_ELEMENT' AND oe.to_key = ?1
             ORDER BY h.seq",
            [element_id],
        )
        .await?;

    let mut healings = Vec::new();
    while let Some(row) = rows.next().await? {
        healings.push(HealingTrace {
            action_id: row.get::<String>(0)?,
            failure_id: row.get::<String>(1)?,
            seq: get_u64(&row, 2)?,
            healing_type: row.get::<String>(3)?,
            timestamp: parse_datetime(&row.get::<String>(4)?)?,
            patch_id: get_opt_string(&row, 5)?,
            prompt_id: get_opt_string(&row, 6)?,
        });
    }
    Ok(healings)
}
