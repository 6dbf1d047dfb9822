//! ID prefixes, sentinel values, and event ID generation.
//!
//! Event nodes (test runs, failures, healing actions) get a fresh
//! `{prefix}-{16 hex}` identity per recording. Reference nodes are keyed by
//! their natural identity and never pass through here.

use crate::errors::CoreError;

pub const PREFIX_TEST_RUN: &str = "run";
pub const PREFIX_FAILURE: &str = "flr";
pub const PREFIX_HEALING_ACTION: &str = "hea";

pub const ALL_PREFIXES: [&str; 3] = [PREFIX_TEST_RUN, PREFIX_FAILURE, PREFIX_HEALING_ACTION];

/// Healing-type label for locators proposed by the external suggestion source.
pub const SUGGESTED_LOCATOR: &str = "suggested-locator";

/// Patch id recorded for patches applied by the auto-heal cycle.
pub const PATCH_AUTO: &str = "patch_auto";

/// Prompt id recorded when no specific suggestion prompt triggered the heal.
pub const PROMPT_AUTO: &str = "auto_prompt";

/// Generate a prefixed event ID, e.g. `"run-9f3a61c2d04be7a1"`.
///
/// # Errors
///
/// Returns `CoreError::Other` if the OS random source is unavailable.
pub fn generate_id(prefix: &str) -> Result<String, CoreError> {
    let mut buf = [0u8; 8];
    getrandom::fill(&mut buf)
        .map_err(|e| CoreError::Other(anyhow::anyhow!("random source unavailable: {e}")))?;
    Ok(format!("{prefix}-{:016x}", u64::from_be_bytes(buf)))
}
