use std::sync::Arc;

use heal_core::enums::RunResult;
use heal_core::requests::{AutoHealRequest, RecordRunRequest};
use heal_core::responses::{AutoHealOutcome, RecordRunResponse};
use heal_engine::{HealingEngine, StaticSuggester};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DemoArgs;
use crate::context::AppContext;
use crate::output::output;

const TEST_ID: &str = "test1";
const ELEMENT_ID: &str = "elem42";
const LOCATOR: &str = "//button[@id='submit']";
const FAILURE_REASON: &str = "Element not found";

#[derive(Debug, Serialize)]
struct DemoResponse {
    recorded: RecordRunResponse,
    auto_heal: AutoHealOutcome,
}

/// Handle `healgraph demo`: record a failing run for `elem42`, then auto-heal it.
pub async fn handle(args: &DemoArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let recorded = ctx
        .graph
        .record_run(
            &RecordRunRequest::new(TEST_ID, ELEMENT_ID, LOCATOR, RunResult::Fail)
                .failure_reason(FAILURE_REASON),
        )
        .await?;

    let request = AutoHealRequest::new(ELEMENT_ID, TEST_ID, LOCATOR)
        .element_context("<button id=\"submit\" type=\"submit\">Submit</button>");

    let auto_heal = match &args.suggest {
        Some(locator) => {
            let engine = HealingEngine::from_config_with_suggester(
                ctx.graph.clone(),
                Arc::new(StaticSuggester::new(locator)),
                &ctx.config,
            );
            engine.auto_heal(&request).await?
        }
        None => ctx.engine.auto_heal(&request).await?,
    };

    output(&DemoResponse { recorded, auto_heal }, flags.format)
}
