use heal_config::HealConfig;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::open_graph;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitResponse {
    status: &'static str,
    path: String,
}

/// Handle `healgraph init`.
pub async fn handle(config: &HealConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let graph = open_graph(config).await?;
    graph.ensure_schema().await?;

    output(
        &InitResponse {
            status: "ok",
            path: config.store.path.clone(),
        },
        flags.format,
    )
}
