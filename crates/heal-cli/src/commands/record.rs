use heal_core::requests::RecordRunRequest;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RecordArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `healgraph record`.
pub async fn handle(args: &RecordArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = ctx.graph.record_run(&to_request(args)).await?;
    output(&response, flags.format)
}

fn to_request(args: &RecordArgs) -> RecordRunRequest {
    RecordRunRequest {
        test_id: args.test_id.clone(),
        element_id: args.element_id.clone(),
        locator: args.locator.clone(),
        result: args.result.clone(),
        healing: args.healing.clone(),
        patch: args.patch.clone(),
        failure_reason: args.failure_reason.clone(),
        prompt_id: args.prompt_id.clone(),
    }
}
