use async_trait::async_trait;
use heal_core::enums::RunResult;

use super::RerunRunner;
use crate::error::RerunError;

/// Always reports the same result.
#[derive(Debug, Clone, Copy)]
pub struct FixedRerun(pub RunResult);

#[async_trait]
impl RerunRunner for FixedRerun {
    async fn rerun(&self, _test_id: &str, _locator: &str) -> Result<RunResult, RerunError> {
        Ok(self.0)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
