use crate::cli::GlobalFlags;
use crate::cli::root_commands::ElementArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `healgraph analytics`.
pub async fn handle(args: &ElementArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let analytics = ctx.graph.element_analytics(&args.element_id).await?;
    output(&analytics, flags.format)
}
