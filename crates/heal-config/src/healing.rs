//! Auto-heal cycle configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the rerun step obtains a pass/fail result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RerunMode {
    /// Unbiased coin flip. Placeholder for real execution.
    #[default]
    Random,
    /// Run `rerun_command` and map its exit status.
    Command,
}

impl fmt::Display for RerunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("random"),
            Self::Command => f.write_str("command"),
        }
    }
}

const fn default_external_fallback() -> bool {
    true
}

fn default_rerun_command() -> Vec<String> {
    vec!["pytest".to_string(), "tests/{test_id}.py".to_string()]
}

const fn default_rerun_timeout_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealingConfig {
    /// Ask the suggestion source when the element has no healing history.
    /// When off, such requests answer "no healing strategies found".
    #[serde(default = "default_external_fallback")]
    pub external_fallback: bool,

    #[serde(default)]
    pub rerun: RerunMode,

    /// Program and arguments; `{test_id}` is substituted in every element.
    #[serde(default = "default_rerun_command")]
    pub rerun_command: Vec<String>,

    #[serde(default = "default_rerun_timeout_secs")]
    pub rerun_timeout_secs: u64,
}

impl Default for HealingConfig {
    fn default() -> Self {
        Self {
            external_fallback: default_external_fallback(),
            rerun: RerunMode::default(),
            rerun_command: default_rerun_command(),
            rerun_timeout_secs: default_rerun_timeout_secs(),
        }
    }
}
