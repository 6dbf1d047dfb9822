use crate::cli::GlobalFlags;
use crate::cli::root_commands::ElementArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `healgraph strategies`.
pub async fn handle(args: &ElementArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let strategies = ctx.graph.ranked_healing_strategies(&args.element_id).await?;
    output(&strategies, flags.format)
}
