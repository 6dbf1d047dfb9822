use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `healgraph stats`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let stats = ctx.graph.stats().await?;
    output(&stats, flags.format)
}
