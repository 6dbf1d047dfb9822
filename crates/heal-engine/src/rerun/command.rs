//! Rerun by spawning the project's test command.
//!
//! Every argument is a template: `{test_id}` and `{locator}` are substituted
//! before spawning. Exit status zero is a pass, anything else a fail.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use heal_core::enums::RunResult;
use tokio::process::Command;
use tracing::{debug, info};

use super::RerunRunner;
use crate::error::RerunError;

#[derive(Debug, Clone)]
pub struct CommandRerun {
    argv: Vec<String>,
    timeout: Duration,
}

impl CommandRerun {
    #[must_use]
    pub const fn new(argv: Vec<String>, timeout: Duration) -> Self {
        Self { argv, timeout }
    }

    /// The argument vector with placeholders filled in.
    #[must_use]
    pub fn render(&self, test_id: &str, locator: &str) -> Vec<String> {
        self.argv
            .iter()
            .map(|arg| arg.replace("{test_id}", test_id).replace("{locator}", locator))
            .collect()
    }
}

#[async_trait]
impl RerunRunner for CommandRerun {
    async fn rerun(&self, test_id: &str, locator: &str) -> Result<RunResult, RerunError> {
        let argv = self.render(test_id, locator);
        let (program, args) = argv.split_first().ok_or(RerunError::EmptyCommand)?;

        debug!(%program, ?args, "spawning rerun command");
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let status = tokio::time::timeout(self.timeout, command.status())
            .await
            .map_err(|_| RerunError::Timeout {
                after_secs: self.timeout.as_secs(),
            })?
            .map_err(|e| RerunError::Spawn {
                program: program.clone(),
                reason: e.to_string(),
            })?;

        let result = if status.success() {
            RunResult::Pass
        } else {
            RunResult::Fail
        };
        info!(test_id, %result, code = ?status.code(), "rerun finished");
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "command"
    }
}
