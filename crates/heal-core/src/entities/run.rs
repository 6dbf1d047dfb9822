use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::RunResult;

/// One execution of a test case.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestRun {
    pub id: String,
    pub test_id: String,
    pub result: RunResult,
    pub timestamp: DateTime<Utc>,
}
