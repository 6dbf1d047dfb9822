//! Suggestion sources that never leave the process.

use async_trait::async_trait;

use super::{Suggestion, SuggestionSource};
use crate::error::SuggestionError;

/// Always proposes the same locator. Handy for demos and tests.
#[derive(Debug, Clone)]
pub struct StaticSuggester {
    suggestion: Suggestion,
}

impl StaticSuggester {
    #[must_use]
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            suggestion: Suggestion::new(locator),
        }
    }

    #[must_use]
    pub fn with_prompt_id(mut self, prompt_id: impl Into<String>) -> Self {
        self.suggestion = self.suggestion.with_prompt_id(prompt_id);
        self
    }
}

#[async_trait]
impl SuggestionSource for StaticSuggester {
    async fn suggest(&self, _context: &str) -> Result<Suggestion, SuggestionError> {
        Ok(self.suggestion.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Stands in when no provider is configured; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredSuggester;

#[async_trait]
impl SuggestionSource for UnconfiguredSuggester {
    async fn suggest(&self, _context: &str) -> Result<Suggestion, SuggestionError> {
        Err(SuggestionError::NotConfigured)
    }

    fn name(&self) -> &'static str {
        "unconfigured"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_source_ignores_context() {
        let source = StaticSuggester::new("//a").with_prompt_id("p-1");
        let first = source.suggest("one").await.unwrap();
        let second = source.suggest("two").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.prompt_id.as_deref(), Some("p-1"));
    }

    #[tokio::test]
    async fn unconfigured_source_always_fails() {
        let err = UnconfiguredSuggester.suggest("ctx").await.unwrap_err();
        assert!(matches!(err, SuggestionError::NotConfigured));
    }
}
