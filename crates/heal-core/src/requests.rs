//! Inbound request shapes for the record-run and auto-heal contracts.
//!
//! Field names match the wire format (`healing`, `patch`, `failure_reason`,
//! `prompt_id`). Validation happens before any store access; a request that
//! fails validation never reaches the graph.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::RunResult;
use crate::errors::CoreError;

/// `RecordRun(testId, elementId, locator, result, healing?, patch?, failureReason?, promptId?)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RecordRunRequest {
    pub test_id: String,
    pub element_id: String,
    pub locator: String,
    pub result: String,
    #[serde(default)]
    pub healing: Option<String>,
    #[serde(default)]
    pub patch: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub prompt_id: Option<String>,
}

impl RecordRunRequest {
    #[must_use]
    pub fn new(
        test_id: impl Into<String>,
        element_id: impl Into<String>,
        locator: impl Into<String>,
        result: RunResult,
    ) -> Self {
        Self {
            test_id: test_id.into(),
            element_id: element_id.into(),
            locator: locator.into(),
            result: result.as_str().to_string(),
            healing: None,
            patch: None,
            failure_reason: None,
            prompt_id: None,
        }
    }

    #[must_use]
    pub fn healing(mut self, healing_type: impl Into<String>) -> Self {
        self.healing = Some(healing_type.into());
        self
    }

    #[must_use]
    pub fn patch(mut self, patch_id: impl Into<String>) -> Self {
        self.patch = Some(patch_id.into());
        self
    }

    #[must_use]
    pub fn failure_reason(mut self, reason: impl Into<String>) -> Self {
        self.failure_reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn prompt_id(mut self, prompt_id: impl Into<String>) -> Self {
        self.prompt_id = Some(prompt_id.into());
        self
    }

    /// Check required fields and parse the result.
    ///
    /// Optional fields that are empty or whitespace-only are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if a required field is blank or the
    /// result is not exactly `pass` or `fail`.
    pub fn validate(&self) -> Result<RunRecord, CoreError> {
        let test_id = required(&self.test_id, "test_id")?;
        let element_id = required(&self.element_id, "element_id")?;
        let locator = required(&self.locator, "locator")?;
        let result: RunResult = self.result.parse()?;

        Ok(RunRecord {
            test_id,
            element_id,
            locator,
            result,
            healing: optional(self.healing.as_deref()),
            patch: optional(self.patch.as_deref()),
            failure_reason: optional(self.failure_reason.as_deref()),
            prompt_id: optional(self.prompt_id.as_deref()),
        })
    }
}

/// A validated `RecordRunRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub test_id: String,
    pub element_id: String,
    pub locator: String,
    pub result: RunResult,
    pub healing: Option<String>,
    pub patch: Option<String>,
    pub failure_reason: Option<String>,
    pub prompt_id: Option<String>,
}

/// `AutoHealAndFeedback(elementId, testId, locator, elementContext?)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AutoHealRequest {
    pub element_id: String,
    pub test_id: String,
    pub locator: String,
    #[serde(default)]
    pub element_context: Option<String>,
}

impl AutoHealRequest {
    #[must_use]
    pub fn new(
        element_id: impl Into<String>,
        test_id: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        Self {
            element_id: element_id.into(),
            test_id: test_id.into(),
            locator: locator.into(),
            element_context: None,
        }
    }

    #[must_use]
    pub fn element_context(mut self, context: impl Into<String>) -> Self {
        self.element_context = Some(context.into());
        self
    }

    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if any required field is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        required(&self.element_id, "element_id")?;
        required(&self.test_id, "test_id")?;
        required(&self.locator, "locator")?;
        Ok(())
    }

    /// Context handed to the suggestion source: the caller's text verbatim,
    /// or one synthesized from the element ID and locator.
    #[must_use]
    pub fn context_or_synthesized(&self) -> String {
        match optional(self.element_context.as_deref()) {
            Some(context) => context,
            None => format!("Element ID: {}, Locator: {}", self.element_id, self.locator),
        }
    }
}

fn required(value: &str, field: &str) -> Result<String, CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::missing(field));
    }
    Ok(value.to_string())
}

fn optional(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(String::from)
}
