//! External locator-suggestion provider configuration.
//!
//! Any OpenAI-compatible chat-completions endpoint works: the provider is
//! addressed by base URL and model name, with an optional bearer key.

use serde::{Deserialize, Serialize};

const fn default_temperature() -> f32 {
    0.2
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SuggesterConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`.
    #[serde(default)]
    pub api_base_url: String,

    /// Model name sent in each request.
    #[serde(default)]
    pub model: String,

    /// Bearer token. Empty for local providers that need none.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on one suggestion call, including connection setup.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SuggesterConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            model: String::new(),
            api_key: String::new(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SuggesterConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty() && !self.model.is_empty()
    }

    /// Full chat-completions URL for the configured base.
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base_url.trim_end_matches('/'))
    }
}
