//! Rerun runners: execute (or simulate) a test and report pass or fail.

mod command;
mod fixed;
mod random;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use heal_config::{HealingConfig, RerunMode};
use heal_core::enums::RunResult;

use crate::error::RerunError;

pub use command::CommandRerun;
pub use fixed::FixedRerun;
pub use random::RandomRerun;

#[async_trait]
pub trait RerunRunner: Send + Sync {
    /// Run `test_id` again, targeting the element through `locator`.
    async fn rerun(&self, test_id: &str, locator: &str) -> Result<RunResult, RerunError>;

    fn name(&self) -> &'static str;
}

/// Build the runner selected by `[healing] rerun`.
#[must_use]
pub fn from_config(config: &HealingConfig) -> Arc<dyn RerunRunner> {
    match config.rerun {
        RerunMode::Random => Arc::new(RandomRerun),
        RerunMode::Command => Arc::new(CommandRerun::new(
            config.rerun_command.clone(),
            Duration::from_secs(config.rerun_timeout_secs),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_selects_runner() {
        let mut config = HealingConfig::default();
        assert_eq!(from_config(&config).name(), "random");

        config.rerun = RerunMode::Command;
        assert_eq!(from_config(&config).name(), "command");
    }
}
