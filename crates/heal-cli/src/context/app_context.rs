use anyhow::Context;
use heal_config::HealConfig;
use heal_db::KnowledgeGraph;
use heal_engine::HealingEngine;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: HealConfig,
    pub graph: KnowledgeGraph,
    pub engine: HealingEngine,
}

impl AppContext {
    /// Open the configured graph and wire the engine around it.
    pub async fn init(config: HealConfig) -> anyhow::Result<Self> {
        let graph = open_graph(&config).await?;
        let engine = HealingEngine::from_config(graph.clone(), &config)
            .context("failed to initialize healing engine")?;
        Ok(Self {
            config,
            graph,
            engine,
        })
    }
}

/// Open (and bootstrap) the graph at `[store] path`, creating its directory.
pub async fn open_graph(config: &HealConfig) -> anyhow::Result<KnowledgeGraph> {
    if let Some(dir) = config.store.parent_dir() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create graph directory {}", dir.display()))?;
    }

    let graph = KnowledgeGraph::open_local(&config.store.path).await?;
    tracing::debug!(path = %config.store.path, "knowledge graph opened");
    Ok(graph)
}
