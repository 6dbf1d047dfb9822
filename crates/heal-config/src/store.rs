//! Graph store location.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Path value that selects a throwaway in-process database.
pub const IN_MEMORY: &str = ":memory:";

fn default_path() -> String {
    ".healgraph/graph.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Local libSQL database file, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl StoreConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY
    }

    /// Directory that must exist before the database file can be opened.
    pub fn parent_dir(&self) -> Option<PathBuf> {
        if self.is_in_memory() {
            return None;
        }
        PathBuf::from(&self.path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
    }
}
