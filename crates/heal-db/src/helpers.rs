//! Row parsing helpers and node-kind to table mapping.

use chrono::{DateTime, Utc};
use heal_core::enums::NodeKind;

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read a non-negative INTEGER column as `u64`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for negative values.
pub fn get_u64(row: &libsql::Row, idx: i32) -> Result<u64, DatabaseError> {
    let value = row.get::<i64>(idx)?;
    u64::try_from(value)
        .map_err(|_| DatabaseError::InvalidState(format!("negative count in column {idx}: {value}")))
}

/// Table and identity column holding nodes of `kind`.
///
/// Exhaustive match: adding a `NodeKind` forces a table decision here.
#[must_use]
pub const fn node_table(kind: NodeKind) -> (&'static str, &'static str) {
    match kind {
        NodeKind::Element => ("elements", "element_id"),
        NodeKind::Locator => ("locators", "value"),
        NodeKind::TestCase => ("test_cases", "test_id"),
        NodeKind::TestRun => ("test_runs", "id"),
        NodeKind::Failure => ("failures", "id"),
        NodeKind::HealingAction => ("healing_actions", "id"),
        NodeKind::Patch => ("patches", "patch_id"),
        NodeKind::Prompt => ("prompts", "prompt_id"),
    }
}
