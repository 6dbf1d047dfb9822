use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the graph database and its uniqueness constraints.
    Init,
    /// Record one test execution against an element locator.
    Record(RecordArgs),
    /// Pick a healing for a broken locator, rerun the test, and record the outcome.
    AutoHeal(AutoHealArgs),
    /// Healing strategies used for an element, most frequent first.
    Strategies(ElementArgs),
    /// The locator with the best success rate for an element.
    SuggestLocator(ElementArgs),
    /// Every run seen through the element's locators, newest first.
    LocatorHistory(ListArgs),
    /// Healing actions that produced a patch, newest first.
    HealingHistory(ListArgs),
    /// Locator, run and failure counts for an element.
    Analytics(ElementArgs),
    /// Node counts per kind and total edges.
    Stats,
    /// Print the JSON schema of a request or response type.
    Schema(SchemaArgs),
    /// Record a failing run for a sample element and auto-heal it.
    Demo(DemoArgs),
}

#[derive(Clone, Debug, Args)]
pub struct RecordArgs {
    /// Test case identifier.
    #[arg(long = "test")]
    pub test_id: String,
    /// Element identifier.
    #[arg(long = "element")]
    pub element_id: String,
    /// Locator used to reach the element.
    #[arg(long)]
    pub locator: String,
    /// Run outcome: pass or fail.
    #[arg(long)]
    pub result: String,
    /// Healing type applied after a failure.
    #[arg(long)]
    pub healing: Option<String>,
    /// Patch produced by the healing.
    #[arg(long)]
    pub patch: Option<String>,
    /// Why the run failed.
    #[arg(long)]
    pub failure_reason: Option<String>,
    /// Prompt that triggered the healing.
    #[arg(long = "prompt")]
    pub prompt_id: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AutoHealArgs {
    #[arg(long = "element")]
    pub element_id: String,
    #[arg(long = "test")]
    pub test_id: String,
    /// The locator that just failed.
    #[arg(long)]
    pub locator: String,
    /// Element context for the suggestion source (HTML snippet, description).
    #[arg(long)]
    pub context: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ElementArgs {
    pub element_id: String,
}

#[derive(Clone, Debug, Args)]
pub struct ListArgs {
    pub element_id: String,
    /// Max entries to print (overrides --limit and the configured default).
    #[arg(long = "max")]
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// One of the names listed by `healgraph schema list`.
    pub type_name: String,
}

#[derive(Clone, Debug, Args)]
pub struct DemoArgs {
    /// Skip the suggestion provider and use this locator instead.
    #[arg(long)]
    pub suggest: Option<String>,
}
