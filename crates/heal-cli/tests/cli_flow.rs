//! Drives the `healgraph` binary end to end in a throwaway project directory.

use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

const FAILING_RERUN: &str = r#"
[healing]
rerun = "command"
rerun_command = ["false"]
"#;

fn project(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".healgraph")).unwrap();
    std::fs::write(dir.path().join(".healgraph/config.toml"), config).unwrap();
    dir
}

fn healgraph(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_healgraph"))
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env_remove("CARGO_MANIFEST_DIR")
        .env_remove("HEALGRAPH_LOG")
        .output()
        .unwrap()
}

fn json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn record(dir: &Path, result: &str, extra: &[&str]) -> Value {
    let mut args = vec![
        "record",
        "--test",
        "test1",
        "--element",
        "elem42",
        "--locator",
        "//button[@id='submit']",
        "--result",
        result,
    ];
    args.extend_from_slice(extra);
    json(&healgraph(dir, &args))
}

#[test]
fn init_creates_the_database() {
    let dir = project("");
    let out = json(&healgraph(dir.path(), &["init"]));
    assert_eq!(out["status"], "ok");
    assert!(dir.path().join(".healgraph/graph.db").exists());
}

#[test]
fn recorded_runs_feed_the_read_commands() {
    let dir = project("");
    let first = record(dir.path(), "pass", &[]);
    assert_eq!(first["status"], "ok");
    record(dir.path(), "fail", &["--failure-reason", "Element not found", "--healing", "retry-wait", "--patch", "p1"]);

    let strategies = json(&healgraph(dir.path(), &["strategies", "elem42"]));
    assert_eq!(strategies, serde_json::json!([{ "healing_type": "retry-wait", "occurrences": 1 }]));

    let analytics = json(&healgraph(dir.path(), &["analytics", "elem42"]));
    assert_eq!(analytics["total_runs"], 2);
    assert_eq!(analytics["failures"], 1);
    assert_eq!(analytics["locator_count"], 1);

    let best = json(&healgraph(dir.path(), &["suggest-locator", "elem42"]));
    assert_eq!(best["locator"], "//button[@id='submit']");
    assert_eq!(best["total"], 2);

    let history = json(&healgraph(dir.path(), &["locator-history", "elem42", "--max", "1"]));
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["result"], "fail");

    let healed = json(&healgraph(dir.path(), &["healing-history", "elem42"]));
    assert_eq!(healed[0]["patch_id"], "p1");
}

#[test]
fn unknown_element_reads_are_empty() {
    let dir = project("");
    assert_eq!(json(&healgraph(dir.path(), &["strategies", "ghost"])), serde_json::json!([]));
    assert_eq!(json(&healgraph(dir.path(), &["suggest-locator", "ghost"])), Value::Null);
}

#[test]
fn invalid_result_exits_with_client_code() {
    let dir = project("");
    let out = healgraph(
        dir.path(),
        &["record", "--test", "t", "--element", "e", "--locator", "//a", "--result", "PASS"],
    );
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("healgraph error:"));
}

#[cfg(unix)]
#[test]
fn auto_heal_uses_graph_history() {
    let dir = project(FAILING_RERUN);
    record(dir.path(), "fail", &["--healing", "retry-wait"]);

    let out = json(&healgraph(
        dir.path(),
        &["auto-heal", "--element", "elem42", "--test", "test1", "--locator", "//button[@id='submit']"],
    ));
    assert_eq!(out["healing_used"], "retry-wait");
    assert_eq!(out["source"], "graph");
    assert_eq!(out["rerun_result"], "fail");

    let strategies = json(&healgraph(dir.path(), &["strategies", "elem42"]));
    assert_eq!(strategies[0]["occurrences"], 2);
}

#[cfg(unix)]
#[test]
fn missing_provider_exits_with_dependency_code() {
    let dir = project(FAILING_RERUN);
    let out = healgraph(
        dir.path(),
        &["auto-heal", "--element", "elem42", "--test", "test1", "--locator", "//a"],
    );
    assert_eq!(out.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Suggestion unavailable"));
}

#[test]
fn disabled_fallback_reports_no_strategies() {
    let dir = project("[healing]\nexternal_fallback = false\n");
    let out = json(&healgraph(
        dir.path(),
        &["auto-heal", "--element", "elem42", "--test", "test1", "--locator", "//a"],
    ));
    assert_eq!(out, serde_json::json!({ "status": "no healing strategies found" }));
}

#[cfg(unix)]
#[test]
fn demo_with_fixed_suggestion_records_a_healing() {
    let dir = project(FAILING_RERUN);
    let out = json(&healgraph(dir.path(), &["demo", "--suggest", "//button[@data-test='submit']"]));
    assert_eq!(out["recorded"]["status"], "ok");
    assert!(out["recorded"]["failure_id"].is_string());
    assert_eq!(out["auto_heal"]["source"], "external");
    assert_eq!(out["auto_heal"]["suggested_locator"], "//button[@data-test='submit']");

    let stats = json(&healgraph(dir.path(), &["stats"]));
    assert_eq!(stats["nodes"]["healing_action"], 1);
}

#[test]
fn db_flag_points_at_another_file() {
    let dir = project("");
    let other = dir.path().join("elsewhere.db");
    let other = other.to_str().unwrap();
    json(&healgraph(dir.path(), &["--db", other, "init"]));
    assert!(Path::new(other).exists());
    assert!(!dir.path().join(".healgraph/graph.db").exists());
}

#[test]
fn schema_list_needs_no_project() {
    let dir = TempDir::new().unwrap();
    let names = json(&healgraph(dir.path(), &["schema", "list"]));
    assert!(names.as_array().unwrap().iter().any(|n| n == "auto-heal-outcome"));
}
