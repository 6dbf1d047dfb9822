use anyhow::Context;
use clap::Parser;
use heal_config::ConfigError;
use heal_db::GraphError;
use heal_engine::{EngineError, ErrorClass};

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("healgraph error: {error:#}");
        std::process::exit(exit_code(&error));
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    if let cli::Commands::Schema(args) = &cli.command {
        return commands::schema::handle(args, &flags);
    }

    let config = bootstrap::load_config(&flags)?;

    if matches!(cli.command, cli::Commands::Init) {
        return commands::init::handle(&config, &flags).await;
    }

    context::warn_unconfigured(&config);

    let ctx = context::AppContext::init(config)
        .await
        .context("failed to initialize healgraph application context")?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("HEALGRAPH_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// 2 for bad input, 3 when the graph store failed, 4 when the suggester or
/// test runner failed, 1 for anything else.
fn exit_code(error: &anyhow::Error) -> i32 {
    let class = error.chain().find_map(|cause| {
        if let Some(err) = cause.downcast_ref::<EngineError>() {
            return Some(err.class());
        }
        if let Some(err) = cause.downcast_ref::<GraphError>() {
            return Some(match err {
                GraphError::InvalidInput(_) => ErrorClass::Client,
                GraphError::StoreUnavailable(_) => ErrorClass::Store,
            });
        }
        cause
            .downcast_ref::<ConfigError>()
            .filter(|err| matches!(err, ConfigError::InvalidValue { .. }))
            .map(|_| ErrorClass::Client)
    });

    match class {
        Some(ErrorClass::Client) => 2,
        Some(ErrorClass::Store) => 3,
        Some(ErrorClass::Dependency) => 4,
        None => 1,
    }
}
