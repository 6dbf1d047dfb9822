//! Unbiased coin-flip rerun. Stands in for real execution until a test runner
//! is configured.

use async_trait::async_trait;
use heal_core::enums::RunResult;

use super::RerunRunner;
use crate::error::RerunError;

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRerun;

#[async_trait]
impl RerunRunner for RandomRerun {
    async fn rerun(&self, _test_id: &str, _locator: &str) -> Result<RunResult, RerunError> {
        let bits = getrandom::u32().map_err(|e| RerunError::Random(e.to_string()))?;
        Ok(if bits & 1 == 0 {
            RunResult::Pass
        } else {
            RunResult::Fail
        })
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
