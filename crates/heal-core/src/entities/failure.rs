use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Created for a test run whose result is `fail`, attached to the element
/// the run targeted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Failure {
    pub id: String,
    pub run_id: String,
    pub element_id: String,
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A labeled remediation applied after a failure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HealingAction {
    pub id: String,
    pub failure_id: String,
    pub healing_type: String,
    pub timestamp: DateTime<Utc>,
}
