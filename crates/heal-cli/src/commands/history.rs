use crate::cli::GlobalFlags;
use crate::cli::root_commands::ListArgs;
use crate::commands::shared::limit::{effective_limit, truncate};
use crate::context::AppContext;
use crate::output::output;

/// Handle `healgraph locator-history`.
pub async fn handle_locators(args: &ListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut history = ctx.graph.locator_history(&args.element_id).await?;
    truncate(&mut history, limit(args, ctx, flags));
    output(&history, flags.format)
}

/// Handle `healgraph healing-history`.
pub async fn handle_healings(args: &ListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut history = ctx.graph.healing_history(&args.element_id).await?;
    truncate(&mut history, limit(args, ctx, flags));
    output(&history, flags.format)
}

fn limit(args: &ListArgs, ctx: &AppContext, flags: &GlobalFlags) -> u32 {
    effective_limit(args.limit, flags.limit, ctx.config.general.default_limit)
}
