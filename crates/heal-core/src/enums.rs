//! Run results, node kinds, relationships, and healing sources.
//!
//! Value enums use `snake_case` serialization. `Relation` keeps the graph's
//! `SCREAMING_SNAKE_CASE` edge labels so stored edges read like the schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// RunResult
// ---------------------------------------------------------------------------

/// Outcome of one test execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RunResult {
    Pass,
    Fail,
}

impl RunResult {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }

    #[must_use]
    pub const fn is_fail(self) -> bool {
        matches!(self, Self::Fail)
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts exactly `pass` or `fail`. No case folding, no aliases.
impl FromStr for RunResult {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass" => Ok(Self::Pass),
            "fail" => Ok(Self::Fail),
            other => Err(CoreError::InvalidInput(format!(
                "result must be 'pass' or 'fail', got '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// HealingSource
// ---------------------------------------------------------------------------

/// Where the healing descriptor of an auto-heal cycle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealingSource {
    /// Top-ranked strategy learned from the element's healing history.
    Graph,
    /// Locator proposed by the external suggestion source.
    External,
}

impl HealingSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Graph => "graph",
            Self::External => "external",
        }
    }
}

impl fmt::Display for HealingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// Every node label in the knowledge graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Element,
    Locator,
    TestCase,
    TestRun,
    Failure,
    HealingAction,
    Patch,
    Prompt,
}

impl NodeKind {
    pub const ALL: [Self; 8] = [
        Self::Element,
        Self::Locator,
        Self::TestCase,
        Self::TestRun,
        Self::Failure,
        Self::HealingAction,
        Self::Patch,
        Self::Prompt,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::Locator => "locator",
            Self::TestCase => "test_case",
            Self::TestRun => "test_run",
            Self::Failure => "failure",
            Self::HealingAction => "healing_action",
            Self::Patch => "patch",
            Self::Prompt => "prompt",
        }
    }

    /// Event nodes get a fresh generated identity per recording; the rest are
    /// reference data upserted by their natural key.
    #[must_use]
    pub const fn is_event(self) -> bool {
        matches!(self, Self::TestRun | Self::Failure | Self::HealingAction)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Relation
// ---------------------------------------------------------------------------

/// Directed relationship between two nodes.
///
/// ```text
/// Element ─LOCATED_BY─▶ Locator ─USED_IN─▶ TestCase ─EXECUTED_IN─▶ TestRun
/// TestRun ─FAILED_AT─▶ Failure ─ON_ELEMENT─▶ Element
/// Failure ─HEALED_BY─▶ HealingAction ─GENERATED_PATCH─▶ Patch
///                                    ─TRIGGERED_BY────▶ Prompt
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relation {
    LocatedBy,
    UsedIn,
    ExecutedIn,
    FailedAt,
    OnElement,
    HealedBy,
    GeneratedPatch,
    TriggeredBy,
}

impl Relation {
    pub const ALL: [Self; 8] = [
        Self::LocatedBy,
        Self::UsedIn,
        Self::ExecutedIn,
        Self::FailedAt,
        Self::OnElement,
        Self::HealedBy,
        Self::GeneratedPatch,
        Self::TriggeredBy,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocatedBy => "LOCATED_BY",
            Self::UsedIn => "USED_IN",
            Self::ExecutedIn => "EXECUTED_IN",
            Self::FailedAt => "FAILED_AT",
            Self::OnElement => "ON_ELEMENT",
            Self::HealedBy => "HEALED_BY",
            Self::GeneratedPatch => "GENERATED_PATCH",
            Self::TriggeredBy => "TRIGGERED_BY",
        }
    }

    /// Source and target node kinds this relation connects.
    #[must_use]
    pub const fn endpoints(self) -> (NodeKind, NodeKind) {
        match self {
            Self::LocatedBy => (NodeKind::Element, NodeKind::Locator),
            Self::UsedIn => (NodeKind::Locator, NodeKind::TestCase),
            Self::ExecutedIn => (NodeKind::TestCase, NodeKind::TestRun),
            Self::FailedAt => (NodeKind::TestRun, NodeKind::Failure),
            Self::OnElement => (NodeKind::Failure, NodeKind::Element),
            Self::HealedBy => (NodeKind::Failure, NodeKind::HealingAction),
            Self::GeneratedPatch => (NodeKind::HealingAction, NodeKind::Patch),
            Self::TriggeredBy => (NodeKind::HealingAction, NodeKind::Prompt),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
