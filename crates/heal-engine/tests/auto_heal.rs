//! End-to-end auto-heal cycles with deterministic suggestion sources and
//! rerun runners. Most run against the in-memory graph store; the full
//! record/heal scenario also runs against libSQL.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use heal_core::enums::{HealingSource, NodeKind, RunResult};
use heal_core::ids::{PATCH_AUTO, SUGGESTED_LOCATOR};
use heal_core::requests::{AutoHealRequest, RecordRunRequest};
use heal_core::responses::{AutoHealOutcome, HealingStrategy};
use heal_db::{DatabaseError, KnowledgeGraph, LibsqlGraphStore, MemoryGraphStore};
use heal_engine::{
    EngineError, FixedRerun, HealingEngine, RerunError, RerunRunner, StaticSuggester, Suggestion,
    SuggestionError, SuggestionSource,
};
use pretty_assertions::assert_eq;

const ELEMENT: &str = "elem42";
const TEST: &str = "test1";
const ORIGINAL: &str = "//button[@id='submit']";
const SUGGESTED: &str = "//button[@data-test='submit']";

fn graph() -> (KnowledgeGraph, Arc<MemoryGraphStore>) {
    let store = Arc::new(MemoryGraphStore::new());
    (KnowledgeGraph::new(store.clone()), store)
}

fn request() -> AutoHealRequest {
    AutoHealRequest::new(ELEMENT, TEST, ORIGINAL)
}

/// Counts calls and returns a fixed locator.
#[derive(Default)]
struct CountingSuggester {
    calls: AtomicUsize,
}

#[async_trait]
impl SuggestionSource for CountingSuggester {
    async fn suggest(&self, _context: &str) -> Result<Suggestion, SuggestionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Suggestion::new(SUGGESTED))
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Records the context it was asked about.
#[derive(Default)]
struct ContextRecorder {
    seen: std::sync::Mutex<Vec<String>>,
}

#[async_trait]
impl SuggestionSource for ContextRecorder {
    async fn suggest(&self, context: &str) -> Result<Suggestion, SuggestionError> {
        self.seen.lock().unwrap().push(context.to_string());
        Ok(Suggestion::new(SUGGESTED))
    }

    fn name(&self) -> &'static str {
        "context-recorder"
    }
}

struct SlowSuggester;

#[async_trait]
impl SuggestionSource for SlowSuggester {
    async fn suggest(&self, _context: &str) -> Result<Suggestion, SuggestionError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Suggestion::new(SUGGESTED))
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

struct FailingSuggester;

#[async_trait]
impl SuggestionSource for FailingSuggester {
    async fn suggest(&self, _context: &str) -> Result<Suggestion, SuggestionError> {
        Err(SuggestionError::Request("HTTP 503: overloaded".into()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Fails the rerun, then takes the store down before RECORD.
struct OutageDuringRerun {
    store: Arc<MemoryGraphStore>,
}

#[async_trait]
impl RerunRunner for OutageDuringRerun {
    async fn rerun(&self, _test_id: &str, _locator: &str) -> Result<RunResult, RerunError> {
        self.store.set_available(false);
        Ok(RunResult::Fail)
    }

    fn name(&self) -> &'static str {
        "outage"
    }
}

/// Remembers the locator each rerun targeted.
#[derive(Default)]
struct LocatorRecorder {
    seen: std::sync::Mutex<Vec<String>>,
}

#[async_trait]
impl RerunRunner for LocatorRecorder {
    async fn rerun(&self, _test_id: &str, locator: &str) -> Result<RunResult, RerunError> {
        self.seen.lock().unwrap().push(locator.to_string());
        Ok(RunResult::Pass)
    }

    fn name(&self) -> &'static str {
        "locator-recorder"
    }
}

#[tokio::test]
async fn suggestion_then_graph_path_on_second_cycle() {
    let (kg, _store) = graph();
    kg.record_run(&RecordRunRequest::new(TEST, ELEMENT, ORIGINAL, RunResult::Pass))
        .await
        .unwrap();

    let engine = HealingEngine::new(
        kg.clone(),
        Arc::new(StaticSuggester::new(SUGGESTED)),
        Arc::new(FixedRerun(RunResult::Fail)),
    );

    let first = engine.auto_heal(&request()).await.unwrap();
    let report = first.report().unwrap();
    assert_eq!(report.healing_used, SUGGESTED_LOCATOR);
    assert_eq!(report.source, HealingSource::External);
    assert_eq!(report.suggested_locator.as_deref(), Some(SUGGESTED));
    assert_eq!(report.rerun_result, RunResult::Fail);

    // The failed rerun left a suggested-locator healing behind.
    let strategies = kg.ranked_healing_strategies(ELEMENT).await.unwrap();
    assert_eq!(strategies.len(), 1);
    assert_eq!(strategies[0].healing_type, SUGGESTED_LOCATOR);
    assert_eq!(strategies[0].occurrences, 1);

    let history = kg.healing_history(ELEMENT).await.unwrap();
    assert_eq!(history[0].patch_id, PATCH_AUTO);

    let second = engine.auto_heal(&request()).await.unwrap();
    let report = second.report().unwrap();
    assert_eq!(report.source, HealingSource::Graph);
    assert_eq!(report.healing_used, SUGGESTED_LOCATOR);
    assert_eq!(report.suggested_locator, None);

    let ranked: Vec<String> = kg
        .ranked_locators(ELEMENT)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.locator)
        .collect();
    assert_eq!(ranked.len(), 2);
    assert!(ranked.contains(&SUGGESTED.to_string()));
}

#[tokio::test]
async fn failed_run_then_failed_heal_leaves_one_suggested_strategy_on_libsql() {
    let store = LibsqlGraphStore::open_in_memory().await.unwrap();
    let kg = KnowledgeGraph::new(Arc::new(store));

    kg.record_run(
        &RecordRunRequest::new(TEST, ELEMENT, ORIGINAL, RunResult::Fail).failure_reason("not found"),
    )
    .await
    .unwrap();
    assert_eq!(kg.ranked_healing_strategies(ELEMENT).await.unwrap(), vec![]);

    let engine = HealingEngine::new(
        kg.clone(),
        Arc::new(StaticSuggester::new(SUGGESTED)),
        Arc::new(FixedRerun(RunResult::Fail)),
    );
    let outcome = engine.auto_heal(&request()).await.unwrap();
    let report = outcome.report().unwrap();
    assert_eq!(report.source, HealingSource::External);
    assert_eq!(report.rerun_result, RunResult::Fail);

    assert_eq!(
        kg.ranked_healing_strategies(ELEMENT).await.unwrap(),
        vec![HealingStrategy {
            healing_type: SUGGESTED_LOCATOR.into(),
            occurrences: 1,
        }]
    );
}

#[tokio::test]
async fn empty_history_uses_the_suggestion() {
    let (kg, _store) = graph();
    let recorder = Arc::new(LocatorRecorder::default());
    let engine = HealingEngine::new(kg.clone(), Arc::new(StaticSuggester::new(SUGGESTED)), recorder.clone());

    let outcome = engine.auto_heal(&request()).await.unwrap();
    let report = outcome.report().unwrap();
    assert_eq!(report.suggested_locator.as_deref(), Some(SUGGESTED));
    assert_eq!(report.rerun_result, RunResult::Pass);
    assert_eq!(*recorder.seen.lock().unwrap(), vec![SUGGESTED.to_string()]);

    // A passing rerun is recorded but creates no failure subgraph.
    let stats = kg.stats().await.unwrap();
    assert_eq!(stats.count(NodeKind::TestRun), 1);
    assert_eq!(stats.count(NodeKind::HealingAction), 0);
    assert_eq!(kg.locator_history(ELEMENT).await.unwrap()[0].locator, SUGGESTED);
}

#[tokio::test]
async fn graph_path_never_consults_the_suggester() {
    let (kg, _store) = graph();
    for healing in ["retry-wait", "scroll-into-view", "retry-wait"] {
        kg.record_run(&RecordRunRequest::new(TEST, ELEMENT, ORIGINAL, RunResult::Fail).healing(healing))
            .await
            .unwrap();
    }

    let suggester = Arc::new(CountingSuggester::default());
    let recorder = Arc::new(LocatorRecorder::default());
    let engine = HealingEngine::new(kg, suggester.clone(), recorder.clone());

    let outcome = engine.auto_heal(&request()).await.unwrap();
    let report = outcome.report().unwrap();
    assert_eq!(report.healing_used, "retry-wait");
    assert_eq!(report.source, HealingSource::Graph);
    assert_eq!(suggester.calls.load(Ordering::SeqCst), 0);
    assert_eq!(*recorder.seen.lock().unwrap(), vec![ORIGINAL.to_string()]);
}

#[tokio::test]
async fn disabled_fallback_reports_no_strategies() {
    let (kg, _store) = graph();
    let suggester = Arc::new(CountingSuggester::default());
    let engine = HealingEngine::new(kg.clone(), suggester.clone(), Arc::new(FixedRerun(RunResult::Pass)))
        .with_external_fallback(false);

    let outcome = engine.auto_heal(&request()).await.unwrap();
    assert!(matches!(outcome, AutoHealOutcome::NoStrategies { .. }));
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        serde_json::json!({ "status": "no healing strategies found" })
    );
    assert_eq!(suggester.calls.load(Ordering::SeqCst), 0);
    assert_eq!(kg.stats().await.unwrap().count(NodeKind::TestRun), 0);
}

#[tokio::test]
async fn missing_context_is_synthesized_from_element_and_locator() {
    let (kg, _store) = graph();
    let recorder = Arc::new(ContextRecorder::default());
    let engine = HealingEngine::new(kg, recorder.clone(), Arc::new(FixedRerun(RunResult::Pass)));

    engine.auto_heal(&request()).await.unwrap();
    engine
        .auto_heal(&request().element_context("<button id=\"submit\">Send</button>"))
        .await
        .unwrap();

    let seen = recorder.seen.lock().unwrap();
    assert!(seen[0].contains(ELEMENT), "{}", seen[0]);
    assert!(seen[0].contains(ORIGINAL), "{}", seen[0]);
    assert_eq!(seen[1], "<button id=\"submit\">Send</button>");
}

#[tokio::test]
async fn store_outage_at_lookup_skips_the_suggester() {
    let (kg, store) = graph();
    store.set_available(false);
    let suggester = Arc::new(CountingSuggester::default());
    let engine = HealingEngine::new(kg, suggester.clone(), Arc::new(FixedRerun(RunResult::Pass)));

    let err = engine.auto_heal(&request()).await.unwrap_err();
    assert!(matches!(err, EngineError::StoreUnavailable(DatabaseError::Unavailable(_))), "{err}");
    assert_eq!(suggester.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn store_outage_at_record_surfaces_store_unavailable() {
    let (kg, store) = graph();
    let engine = HealingEngine::new(
        kg,
        Arc::new(StaticSuggester::new(SUGGESTED)),
        Arc::new(OutageDuringRerun { store: store.clone() }),
    );

    let err = engine.auto_heal(&request()).await.unwrap_err();
    assert!(matches!(err, EngineError::StoreUnavailable(_)), "{err}");

    store.set_available(true);
    let stats = store_stats(&store).await;
    assert_eq!(stats, 0, "nothing should have been written");
}

async fn store_stats(store: &Arc<MemoryGraphStore>) -> u64 {
    KnowledgeGraph::new(store.clone())
        .stats()
        .await
        .unwrap()
        .nodes
        .values()
        .sum()
}

#[tokio::test]
async fn slow_suggester_times_out_and_records_nothing() {
    let (kg, store) = graph();
    let engine = HealingEngine::new(kg, Arc::new(SlowSuggester), Arc::new(FixedRerun(RunResult::Pass)))
        .with_suggestion_timeout(Duration::from_millis(50));

    let err = engine.auto_heal(&request()).await.unwrap_err();
    assert!(
        matches!(err, EngineError::SuggestionUnavailable(SuggestionError::Timeout { .. })),
        "{err}"
    );
    assert_eq!(store_stats(&store).await, 0);
}

#[tokio::test]
async fn failing_suggester_is_not_replaced_by_a_default() {
    let (kg, store) = graph();
    let engine = HealingEngine::new(kg, Arc::new(FailingSuggester), Arc::new(FixedRerun(RunResult::Fail)));

    let err = engine.auto_heal(&request()).await.unwrap_err();
    assert!(matches!(err, EngineError::SuggestionUnavailable(SuggestionError::Request(_))), "{err}");
    assert_eq!(store_stats(&store).await, 0);
}

#[tokio::test]
async fn empty_suggestion_is_rejected() {
    let (kg, _store) = graph();
    let engine = HealingEngine::new(kg, Arc::new(StaticSuggester::new("   ")), Arc::new(FixedRerun(RunResult::Pass)));

    let err = engine.auto_heal(&request()).await.unwrap_err();
    assert!(
        matches!(err, EngineError::SuggestionUnavailable(SuggestionError::MalformedResponse(_))),
        "{err}"
    );
}

#[tokio::test]
async fn blank_fields_are_rejected_before_any_store_access() {
    let (kg, store) = graph();
    store.set_available(false);
    let engine = HealingEngine::new(kg, Arc::new(CountingSuggester::default()), Arc::new(FixedRerun(RunResult::Pass)));

    for req in [
        AutoHealRequest::new("", TEST, ORIGINAL),
        AutoHealRequest::new(ELEMENT, " ", ORIGINAL),
        AutoHealRequest::new(ELEMENT, TEST, ""),
    ] {
        let err = engine.auto_heal(&req).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)), "{err}");
    }
}

#[tokio::test]
async fn provider_prompt_id_is_linked_to_the_healing_action() {
    let (kg, _store) = graph();
    let engine = HealingEngine::new(
        kg.clone(),
        Arc::new(StaticSuggester::new(SUGGESTED).with_prompt_id("chatcmpl-123")),
        Arc::new(FixedRerun(RunResult::Fail)),
    );

    engine.auto_heal(&request()).await.unwrap();
    engine.auto_heal(&request()).await.unwrap();

    // Two healing actions, one shared patch; only the external cycle carried
    // the provider id, the graph cycle used the sentinel prompt.
    let stats = kg.stats().await.unwrap();
    assert_eq!(stats.count(NodeKind::HealingAction), 2);
    assert_eq!(stats.count(NodeKind::Patch), 1);
    assert_eq!(stats.count(NodeKind::Prompt), 2);
}
