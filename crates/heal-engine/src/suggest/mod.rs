//! Suggestion sources: given element context, propose a locator.
//!
//! The engine only sees the [`SuggestionSource`] capability, so providers and
//! deterministic fakes are interchangeable.

mod fixed;
mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use heal_config::SuggesterConfig;

use crate::error::SuggestionError;

pub use fixed::{StaticSuggester, UnconfiguredSuggester};
pub use openai::{OpenAiSuggester, PROMPT_PREFIX};

/// A proposed locator and, when the provider reports one, the id of the
/// request that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub locator: String,
    pub prompt_id: Option<String>,
}

impl Suggestion {
    #[must_use]
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            prompt_id: None,
        }
    }

    #[must_use]
    pub fn with_prompt_id(mut self, prompt_id: impl Into<String>) -> Self {
        self.prompt_id = Some(prompt_id.into());
        self
    }
}

#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Propose a locator for the element described by `context`.
    async fn suggest(&self, context: &str) -> Result<Suggestion, SuggestionError>;

    /// Short provider label for logs.
    fn name(&self) -> &'static str;
}

/// Build the source described by `config`: the HTTP provider when a base URL
/// and model are set, otherwise one that always reports `NotConfigured`.
///
/// # Errors
///
/// Returns `SuggestionError::Request` if the HTTP client cannot be built.
pub fn from_config(config: &SuggesterConfig) -> Result<Arc<dyn SuggestionSource>, SuggestionError> {
    if config.is_configured() {
        Ok(Arc::new(OpenAiSuggester::from_config(config)?))
    } else {
        Ok(Arc::new(UnconfiguredSuggester))
    }
}

/// Pull a bare locator out of a model answer: drops a surrounding code fence
/// and matching quotes or backticks, keeps the first non-empty line.
#[must_use]
pub fn clean_locator(raw: &str) -> Option<String> {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Skip the info string (e.g. ```xpath) up to the first newline.
        text = rest.split_once('\n').map_or("", |(_, body)| body);
        text = text.trim_end().strip_suffix("```").unwrap_or(text);
    }

    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    let unquoted = ['"', '\'', '`']
        .iter()
        .find_map(|q| line.strip_prefix(*q).and_then(|l| l.strip_suffix(*q)))
        .unwrap_or(line)
        .trim();

    (!unquoted.is_empty()).then(|| unquoted.to_string())
}
