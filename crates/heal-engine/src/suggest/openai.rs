//! OpenAI-compatible chat completion suggester (`/chat/completions`).
//!
//! One round-trip per suggestion. The response `id` is kept as the prompt id
//! so the healing action can be traced back to the request that produced it.
//! Wire types are private to this module.

use std::time::Duration;

use async_trait::async_trait;
use heal_config::SuggesterConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use super::{Suggestion, SuggestionSource, clean_locator};
use crate::error::SuggestionError;

/// Prompt sent for every suggestion, with the element context appended.
pub const PROMPT_PREFIX: &str = "Suggest a robust XPath for the following element context: ";

#[derive(Debug, Clone)]
pub struct OpenAiSuggester {
    client: Client,
    url: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
}

impl OpenAiSuggester {
    /// # Errors
    ///
    /// Returns `SuggestionError::Request` if the HTTP client cannot be built.
    pub fn from_config(config: &SuggesterConfig) -> Result<Self, SuggestionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SuggestionError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.chat_completions_url(),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key: Some(config.api_key.clone()).filter(|k| !k.is_empty()),
        })
    }
}

#[async_trait]
impl SuggestionSource for OpenAiSuggester {
    async fn suggest(&self, context: &str) -> Result<Suggestion, SuggestionError> {
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: format!("{PROMPT_PREFIX}{context}"),
            }],
            temperature: Some(self.temperature),
        };

        debug!(model = %payload.model, context_len = context.len(), "requesting locator suggestion");
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(payload = %json, "full suggestion request payload");
        }

        let mut req = self.client.post(&self.url).json(&payload);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await.map_err(|e| {
            error!(url = %self.url, error = %e, "suggestion request failed (transport)");
            SuggestionError::Request(e.to_string())
        })?;
        let response = check_status(response).await?;

        let parsed = response.json::<ChatCompletionResponse>().await.map_err(|e| {
            error!(error = %e, "failed to deserialize suggestion response");
            SuggestionError::MalformedResponse(format!("failed to parse response body: {e}"))
        })?;

        let raw = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SuggestionError::MalformedResponse("no content in response".into()))?;
        let locator = clean_locator(&raw).ok_or_else(|| {
            SuggestionError::MalformedResponse("response content holds no locator".into())
        })?;

        debug!(%locator, prompt_id = ?parsed.id, "locator suggested");
        Ok(Suggestion {
            locator,
            prompt_id: parsed.id.filter(|id| !id.is_empty()),
        })
    }

    fn name(&self) -> &'static str {
        "openai-compatible"
    }
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    id: Option<String>,
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// Error envelope used by OpenAI and compatible APIs.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Return the response if successful, otherwise a `Request` error carrying
/// the provider's message when it sent one.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SuggestionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let message = serde_json::from_str::<ErrorEnvelope>(&body).map_or_else(
        |_| format!("HTTP {status}: {body}"),
        |env| format!("HTTP {status}: {}", env.error.message),
    );

    error!(%status, %message, "suggestion request returned HTTP error");
    Err(SuggestionError::Request(message))
}
