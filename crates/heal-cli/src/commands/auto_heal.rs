use heal_core::requests::AutoHealRequest;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AutoHealArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `healgraph auto-heal`.
pub async fn handle(args: &AutoHealArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let request = AutoHealRequest {
        element_id: args.element_id.clone(),
        test_id: args.test_id.clone(),
        locator: args.locator.clone(),
        element_context: args.context.clone(),
    };

    let outcome = ctx.engine.auto_heal(&request).await?;
    output(&outcome, flags.format)
}
