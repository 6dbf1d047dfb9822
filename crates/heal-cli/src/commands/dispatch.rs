use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Record(args) => commands::record::handle(&args, ctx, flags).await,
        Commands::AutoHeal(args) => commands::auto_heal::handle(&args, ctx, flags).await,
        Commands::Strategies(args) => commands::strategies::handle(&args, ctx, flags).await,
        Commands::SuggestLocator(args) => commands::suggest_locator::handle(&args, ctx, flags).await,
        Commands::LocatorHistory(args) => commands::history::handle_locators(&args, ctx, flags).await,
        Commands::HealingHistory(args) => commands::history::handle_healings(&args, ctx, flags).await,
        Commands::Analytics(args) => commands::analytics::handle(&args, ctx, flags).await,
        Commands::Stats => commands::stats::handle(ctx, flags).await,
        Commands::Demo(args) => commands::demo::handle(&args, ctx, flags).await,
        Commands::Init | Commands::Schema(_) => {
            unreachable!("init/schema are pre-dispatched in main")
        }
    }
}
