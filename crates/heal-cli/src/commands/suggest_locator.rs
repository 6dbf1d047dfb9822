use crate::cli::GlobalFlags;
use crate::cli::root_commands::ElementArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `healgraph suggest-locator`. Prints `null` when the element has no runs.
pub async fn handle(args: &ElementArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let best = ctx.graph.best_locator(&args.element_id).await?;
    if best.is_none() {
        tracing::info!(element_id = %args.element_id, "no locator runs recorded");
    }
    output(&best, flags.format)
}
