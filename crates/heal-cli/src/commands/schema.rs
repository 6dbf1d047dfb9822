use anyhow::bail;
use heal_core::requests::{AutoHealRequest, RecordRunRequest};
use heal_core::responses::{
    AutoHealOutcome, ElementAnalytics, GraphStats, HealingHistoryEntry, HealingStrategy,
    LocatorHistoryEntry, LocatorRank, RecordRunResponse,
};
use schemars::{JsonSchema, Schema, schema_for};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Type names accepted by `healgraph schema`.
pub const TYPE_NAMES: &[&str] = &[
    "record-run-request",
    "record-run-response",
    "auto-heal-request",
    "auto-heal-outcome",
    "healing-strategies",
    "locator-suggestion",
    "locator-history",
    "healing-history",
    "element-analytics",
    "graph-stats",
];

/// Handle `healgraph schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    if args.type_name == "list" {
        return output(&TYPE_NAMES, flags.format);
    }
    let schema = schema_by_name(&args.type_name)?;
    output(&schema, flags.format)
}

fn schema_by_name(name: &str) -> anyhow::Result<Schema> {
    let schema = match name {
        "record-run-request" => schema_for!(RecordRunRequest),
        "record-run-response" => schema_for!(RecordRunResponse),
        "auto-heal-request" => schema_for!(AutoHealRequest),
        "auto-heal-outcome" => schema_for!(AutoHealOutcome),
        "healing-strategies" => list_of::<HealingStrategy>(),
        "locator-suggestion" => schema_for!(Option<LocatorRank>),
        "locator-history" => list_of::<LocatorHistoryEntry>(),
        "healing-history" => list_of::<HealingHistoryEntry>(),
        "element-analytics" => schema_for!(ElementAnalytics),
        "graph-stats" => schema_for!(GraphStats),
        other => bail!(
            "unknown schema type '{other}' (expected one of: {})",
            TYPE_NAMES.join(", ")
        ),
    };
    Ok(schema)
}

fn list_of<T: JsonSchema>() -> Schema {
    schema_for!(Vec<T>)
}

#[cfg(test)]
mod tests {
    use super::{TYPE_NAMES, schema_by_name};

    #[test]
    fn every_listed_type_has_a_schema() {
        for name in TYPE_NAMES {
            let schema = schema_by_name(name).unwrap();
            let value = serde_json::to_value(&schema).unwrap();
            assert!(value.is_object(), "{name}");
        }
    }

    #[test]
    fn record_request_schema_requires_ids() {
        let value = serde_json::to_value(schema_by_name("record-run-request").unwrap()).unwrap();
        let required = value["required"].as_array().unwrap();
        for field in ["test_id", "element_id", "locator", "result"] {
            assert!(required.iter().any(|v| v == field), "{field} should be required");
        }
    }

    #[test]
    fn unknown_type_lists_choices() {
        let err = schema_by_name("nope").unwrap_err().to_string();
        assert!(err.contains("graph-stats"), "{err}");
    }
}
