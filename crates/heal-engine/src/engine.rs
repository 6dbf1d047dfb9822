//! One auto-heal cycle per call:
//!
//! ```text
//! START -> STRATEGY_LOOKUP -> GRAPH_PATH | SUGGEST_PATH -> RERUN -> RECORD -> DONE
//! ```
//!
//! Nothing carries over between calls. Store failures at lookup or record
//! abort the cycle; suggestion failures surface as `SuggestionUnavailable`
//! and are never replaced by a default locator.

use std::sync::Arc;
use std::time::Duration;

use heal_config::HealConfig;
use heal_core::enums::{HealingSource, RunResult};
use heal_core::ids::{PATCH_AUTO, PROMPT_AUTO, SUGGESTED_LOCATOR};
use heal_core::requests::{AutoHealRequest, RecordRunRequest};
use heal_core::responses::{AutoHealOutcome, AutoHealReport};
use heal_db::KnowledgeGraph;
use tracing::{debug, info, warn};

use crate::error::{EngineError, SuggestionError};
use crate::rerun::{self, RerunRunner};
use crate::suggest::{self, Suggestion, SuggestionSource};

const DEFAULT_SUGGESTION_TIMEOUT: Duration = Duration::from_secs(30);

/// The healing descriptor chosen by the lookup stage.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Decision {
    /// Top-ranked strategy type, applied to the caller's locator.
    Graph { healing_type: String },
    /// Externally proposed locator, tagged `suggested-locator`.
    Suggested(Suggestion),
}

impl Decision {
    const fn source(&self) -> HealingSource {
        match self {
            Self::Graph { .. } => HealingSource::Graph,
            Self::Suggested(_) => HealingSource::External,
        }
    }

    fn healing_type(&self) -> &str {
        match self {
            Self::Graph { healing_type } => healing_type,
            Self::Suggested(_) => SUGGESTED_LOCATOR,
        }
    }

    /// Locator the rerun targets and the new run is recorded under.
    fn locator<'a>(&'a self, req: &'a AutoHealRequest) -> &'a str {
        match self {
            Self::Graph { .. } => &req.locator,
            Self::Suggested(suggestion) => &suggestion.locator,
        }
    }

    fn prompt_id(&self) -> &str {
        match self {
            Self::Suggested(Suggestion {
                prompt_id: Some(id),
                ..
            }) => id,
            _ => PROMPT_AUTO,
        }
    }
}

pub struct HealingEngine {
    graph: KnowledgeGraph,
    suggester: Arc<dyn SuggestionSource>,
    rerun: Arc<dyn RerunRunner>,
    external_fallback: bool,
    suggestion_timeout: Duration,
}

impl HealingEngine {
    /// Engine with the external fallback on and a 30 second suggestion bound.
    #[must_use]
    pub fn new(
        graph: KnowledgeGraph,
        suggester: Arc<dyn SuggestionSource>,
        rerun: Arc<dyn RerunRunner>,
    ) -> Self {
        Self {
            graph,
            suggester,
            rerun,
            external_fallback: true,
            suggestion_timeout: DEFAULT_SUGGESTION_TIMEOUT,
        }
    }

    /// Wire suggester, rerun runner and options from configuration.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SuggestionUnavailable` if the suggestion client
    /// cannot be built.
    pub fn from_config(graph: KnowledgeGraph, config: &HealConfig) -> Result<Self, EngineError> {
        let suggester = suggest::from_config(&config.suggester)?;
        Ok(Self::from_config_with_suggester(graph, suggester, config))
    }

    /// Like [`Self::from_config`], but with a caller-chosen suggestion source.
    /// The rerun runner, fallback switch and suggestion timeout still come
    /// from `config`.
    #[must_use]
    pub fn from_config_with_suggester(
        graph: KnowledgeGraph,
        suggester: Arc<dyn SuggestionSource>,
        config: &HealConfig,
    ) -> Self {
        Self::new(graph, suggester, rerun::from_config(&config.healing))
            .with_external_fallback(config.healing.external_fallback)
            .with_suggestion_timeout(Duration::from_secs(config.suggester.timeout_secs))
    }

    /// When off, an element without healing history answers
    /// "no healing strategies found" instead of asking the suggester.
    #[must_use]
    pub const fn with_external_fallback(mut self, enabled: bool) -> Self {
        self.external_fallback = enabled;
        self
    }

    #[must_use]
    pub const fn with_suggestion_timeout(mut self, timeout: Duration) -> Self {
        self.suggestion_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    /// Run one auto-heal cycle for `req` and record its outcome.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if a required field is blank (nothing is read or written).
    /// - `StoreUnavailable` if the strategy lookup or the final record fails.
    /// - `SuggestionUnavailable` if the suggester fails, times out, or returns
    ///   an empty locator.
    /// - `RerunUnavailable` if the rerun could not produce a result.
    pub async fn auto_heal(&self, req: &AutoHealRequest) -> Result<AutoHealOutcome, EngineError> {
        req.validate()?;

        let strategies = self.graph.ranked_healing_strategies(&req.element_id).await?;
        let decision = match strategies.into_iter().next() {
            Some(top) => {
                info!(element_id = %req.element_id, healing_type = %top.healing_type, "graph path selected");
                Decision::Graph {
                    healing_type: top.healing_type,
                }
            }
            None if !self.external_fallback => {
                info!(element_id = %req.element_id, "no healing history and external fallback disabled");
                return Ok(AutoHealOutcome::no_strategies());
            }
            None => {
                info!(element_id = %req.element_id, source = self.suggester.name(), "suggest path selected");
                Decision::Suggested(self.suggest(req).await?)
            }
        };

        let locator = decision.locator(req);
        let rerun_result = self.rerun.rerun(&req.test_id, locator).await?;
        info!(test_id = %req.test_id, %rerun_result, runner = self.rerun.name(), "rerun finished");

        let recorded = self
            .graph
            .record_run(&record_request(req, &decision, rerun_result))
            .await?;

        let suggested_locator = match &decision {
            Decision::Suggested(suggestion) => Some(suggestion.locator.clone()),
            Decision::Graph { .. } => None,
        };
        Ok(AutoHealOutcome::Healed(AutoHealReport {
            healing_used: decision.healing_type().to_string(),
            rerun_result,
            source: decision.source(),
            suggested_locator,
            run_id: recorded.run_id,
        }))
    }

    async fn suggest(&self, req: &AutoHealRequest) -> Result<Suggestion, EngineError> {
        let context = req.context_or_synthesized();
        debug!(element_id = %req.element_id, context_len = context.len(), "asking suggestion source");

        let outcome = tokio::time::timeout(self.suggestion_timeout, self.suggester.suggest(&context))
            .await
            .map_err(|_| SuggestionError::Timeout {
                after_secs: self.suggestion_timeout.as_secs(),
            })
            .and_then(|inner| inner);

        let suggestion = match outcome {
            Ok(s) if s.locator.trim().is_empty() => Err(SuggestionError::MalformedResponse(
                "suggested locator is empty".into(),
            )),
            other => other,
        }
        .inspect_err(|error| warn!(element_id = %req.element_id, %error, "suggestion unavailable"))?;

        Ok(suggestion)
    }
}

/// The record written for a finished cycle: sentinel patch, no failure
/// reason, and the suggestion's prompt id when one exists.
fn record_request(req: &AutoHealRequest, decision: &Decision, result: RunResult) -> RecordRunRequest {
    RecordRunRequest::new(&req.test_id, &req.element_id, decision.locator(req), result)
        .healing(decision.healing_type())
        .patch(PATCH_AUTO)
        .prompt_id(decision.prompt_id())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn request() -> AutoHealRequest {
        AutoHealRequest::new("elem42", "test1", "//button[@id='submit']")
    }

    #[test]
    fn graph_decision_keeps_caller_locator_and_auto_prompt() {
        let decision = Decision::Graph {
            healing_type: "retry-wait".into(),
        };
        let rec = record_request(&request(), &decision, RunResult::Fail);

        assert_eq!(rec.locator, "//button[@id='submit']");
        assert_eq!(rec.healing.as_deref(), Some("retry-wait"));
        assert_eq!(rec.patch.as_deref(), Some(PATCH_AUTO));
        assert_eq!(rec.prompt_id.as_deref(), Some(PROMPT_AUTO));
        assert_eq!(rec.failure_reason, None);
    }

    #[test]
    fn suggested_decision_records_the_new_locator() {
        let decision = Decision::Suggested(Suggestion::new("//button[@data-test='submit']"));
        let rec = record_request(&request(), &decision, RunResult::Pass);

        assert_eq!(rec.locator, "//button[@data-test='submit']");
        assert_eq!(rec.healing.as_deref(), Some(SUGGESTED_LOCATOR));
        assert_eq!(rec.prompt_id.as_deref(), Some(PROMPT_AUTO));
        assert_eq!(decision.source(), HealingSource::External);
    }

    #[test]
    fn caller_suggester_keeps_configured_options() {
        let mut config = HealConfig::default();
        config.suggester.timeout_secs = 7;
        config.healing.external_fallback = false;

        let engine = HealingEngine::from_config_with_suggester(
            KnowledgeGraph::in_memory(),
            Arc::new(suggest::StaticSuggester::new("//a")),
            &config,
        );
        assert_eq!(engine.suggestion_timeout, Duration::from_secs(7));
        assert!(!engine.external_fallback);
        assert_eq!(engine.suggester.name(), "static");
    }

    #[test]
    fn provider_prompt_id_replaces_the_sentinel() {
        let decision = Decision::Suggested(Suggestion::new("//a").with_prompt_id("chatcmpl-9"));
        assert_eq!(decision.prompt_id(), "chatcmpl-9");
    }
}
