//! Response types returned by the knowledge graph queries and the auto-heal
//! contract, rendered as JSON by `healgraph` commands.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{HealingSource, NodeKind, RunResult};

/// Status string of the no-fallback auto-heal variant.
pub const NO_HEALING_STRATEGIES: &str = "no healing strategies found";

/// Response from `healgraph record`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RecordRunResponse {
    pub status: String,
    pub run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healing_action_id: Option<String>,
}

/// Success statistics for one locator of an element.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LocatorRank {
    pub locator: String,
    pub passes: u64,
    pub total: u64,
    pub success_rate: f64,
}

/// How often a healing type was applied to failures on an element.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HealingStrategy {
    pub healing_type: String,
    pub occurrences: u64,
}

/// One test run observed through one of an element's locators.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LocatorHistoryEntry {
    pub locator: String,
    pub result: RunResult,
    pub timestamp: DateTime<Utc>,
}

/// A healing action that produced a patch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HealingHistoryEntry {
    pub healing_type: String,
    pub patch_id: String,
    pub healed_at: DateTime<Utc>,
}

/// Summary row for one element. All counts are zero for a never-seen element.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ElementAnalytics {
    pub element_id: String,
    pub locator_count: u64,
    pub total_runs: u64,
    pub failures: u64,
}

/// Result of one completed auto-heal cycle.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AutoHealReport {
    pub healing_used: String,
    pub rerun_result: RunResult,
    pub source: HealingSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_locator: Option<String>,
    pub run_id: String,
}

/// Response from `healgraph auto-heal`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum AutoHealOutcome {
    Healed(AutoHealReport),
    /// Only produced when the external fallback is disabled.
    NoStrategies { status: String },
}

impl AutoHealOutcome {
    #[must_use]
    pub fn no_strategies() -> Self {
        Self::NoStrategies {
            status: NO_HEALING_STRATEGIES.to_string(),
        }
    }

    #[must_use]
    pub const fn report(&self) -> Option<&AutoHealReport> {
        match self {
            Self::Healed(report) => Some(report),
            Self::NoStrategies { .. } => None,
        }
    }
}

/// Response from `healgraph stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: BTreeMap<NodeKind, u64>,
    pub edges: u64,
}

impl GraphStats {
    #[must_use]
    pub fn count(&self, kind: NodeKind) -> u64 {
        self.nodes.get(&kind).copied().unwrap_or(0)
    }
}
