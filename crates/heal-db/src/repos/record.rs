//! Recording test runs into the graph.

use chrono::{DateTime, Utc};
use heal_core::entities::{Failure, HealingAction, TestRun};
use heal_core::enums::{NodeKind, Relation};
use heal_core::ids::{PREFIX_FAILURE, PREFIX_HEALING_ACTION, PREFIX_TEST_RUN, generate_id};
use heal_core::requests::{RecordRunRequest, RunRecord};
use heal_core::responses::RecordRunResponse;
use tracing::debug;

use crate::error::GraphError;
use crate::service::KnowledgeGraph;
use crate::store::{EventNode, GraphBatch};

impl KnowledgeGraph {
    /// Record one test run, timestamped now.
    ///
    /// Element, locator and test case are upserted; a new test run is always
    /// appended. A failing run gets a failure node, and a failure with a
    /// healing type gets a healing action plus optional patch and prompt.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::InvalidInput` before touching the store if the
    /// request is malformed, or `GraphError::StoreUnavailable` if the write
    /// could not be committed. Nothing is partially applied.
    pub async fn record_run(&self, req: &RecordRunRequest) -> Result<RecordRunResponse, GraphError> {
        self.record_run_at(req, Utc::now()).await
    }

    /// [`Self::record_run`] with an explicit timestamp for every created event.
    ///
    /// # Errors
    ///
    /// Same as [`Self::record_run`].
    pub async fn record_run_at(
        &self,
        req: &RecordRunRequest,
        timestamp: DateTime<Utc>,
    ) -> Result<RecordRunResponse, GraphError> {
        let record = req.validate()?;
        let (batch, response) = plan_record(&record, timestamp)?;

        self.store().commit(batch).await?;

        debug!(
            run_id = %response.run_id,
            element_id = %record.element_id,
            result = %record.result,
            healed = response.healing_action_id.is_some(),
            "run recorded"
        );
        Ok(response)
    }
}

/// Build the batch for one recording and the ids it will create.
fn plan_record(
    record: &RunRecord,
    timestamp: DateTime<Utc>,
) -> Result<(GraphBatch, RecordRunResponse), GraphError> {
    let run_id = generate_id(PREFIX_TEST_RUN)?;
    let mut batch = GraphBatch::new();

    batch
        .upsert(NodeKind::Element, &record.element_id)
        .upsert(NodeKind::Locator, &record.locator)
        .upsert(NodeKind::TestCase, &record.test_id)
        .event(EventNode::TestRun(TestRun {
            id: run_id.clone(),
            test_id: record.test_id.clone(),
            result: record.result,
            timestamp,
        }))
        .link(Relation::LocatedBy, &record.element_id, &record.locator)
        .link(Relation::UsedIn, &record.locator, &record.test_id)
        .link(Relation::ExecutedIn, &record.test_id, &run_id);

    let mut response = RecordRunResponse {
        status: "ok".to_string(),
        run_id: run_id.clone(),
        failure_id: None,
        healing_action_id: None,
    };

    if !record.result.is_fail() {
        return Ok((batch, response));
    }

    let failure_id = generate_id(PREFIX_FAILURE)?;
    batch
        .event(EventNode::Failure(Failure {
            id: failure_id.clone(),
            run_id: run_id.clone(),
            element_id: record.element_id.clone(),
            reason: record.failure_reason.clone(),
            timestamp,
        }))
        .link(Relation::FailedAt, &run_id, &failure_id)
        .link(Relation::OnElement, &failure_id, &record.element_id);
    response.failure_id = Some(failure_id.clone());

    let Some(healing_type) = &record.healing else {
        return Ok((batch, response));
    };

    let action_id = generate_id(PREFIX_HEALING_ACTION)?;
    batch
        .event(EventNode::HealingAction(HealingAction {
            id: action_id.clone(),
            failure_id: failure_id.clone(),
            healing_type: healing_type.clone(),
            timestamp,
        }))
        .link(Relation::HealedBy, &failure_id, &action_id);

    if let Some(patch_id) = &record.patch {
        batch
            .upsert(NodeKind::Patch, patch_id)
            .link(Relation::GeneratedPatch, &action_id, patch_id);
    }
    if let Some(prompt_id) = &record.prompt_id {
        batch
            .upsert(NodeKind::Prompt, prompt_id)
            .link(Relation::TriggeredBy, &action_id, prompt_id);
    }
    response.healing_action_id = Some(action_id);

    Ok((batch, response))
}
