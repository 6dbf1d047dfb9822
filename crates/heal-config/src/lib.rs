//! # heal-config
//!
//! Layered configuration loading for healgraph using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`HEALGRAPH_*` prefix, `__` as separator)
//! 2. Project-level `.healgraph/config.toml`
//! 3. User-level `~/.config/healgraph/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `HEALGRAPH_STORE__PATH` -> `store.path`,
//! `HEALGRAPH_SUGGESTER__API_KEY` -> `suggester.api_key`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use heal_config::HealConfig;
//!
//! let config = HealConfig::load_with_dotenv().expect("config");
//!
//! if config.suggester.is_configured() {
//!     println!("Suggester model: {}", config.suggester.model);
//! }
//! ```

mod error;
mod general;
mod healing;
mod store;
mod suggester;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use healing::{HealingConfig, RerunMode};
pub use store::{IN_MEMORY, StoreConfig};
pub use suggester::SuggesterConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "HEALGRAPH_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HealConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub suggester: SuggesterConfig,
    #[serde(default)]
    pub healing: HealingConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl HealConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed, or
    /// `ConfigError::InvalidValue` if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the full figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        Self::file_layers().merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values that deserialize fine but cannot work at runtime.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.path.trim().is_empty() {
            return Err(ConfigError::invalid("store.path", "must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.suggester.temperature) {
            return Err(ConfigError::invalid(
                "suggester.temperature",
                format!("{} is outside 0.0..=2.0", self.suggester.temperature),
            ));
        }
        if self.suggester.timeout_secs == 0 {
            return Err(ConfigError::invalid("suggester.timeout_secs", "must be positive"));
        }
        if self.healing.rerun == RerunMode::Command && self.healing.rerun_command.is_empty() {
            return Err(ConfigError::invalid(
                "healing.rerun_command",
                "must name a program when rerun = \"command\"",
            ));
        }
        if self.healing.rerun_timeout_secs == 0 {
            return Err(ConfigError::invalid("healing.rerun_timeout_secs", "must be positive"));
        }
        Ok(())
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn file_layers() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".healgraph/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("healgraph").join("config.toml"))
    }

    /// Walks up from `CARGO_MANIFEST_DIR` (if set) looking for `.env`, then
    /// falls back to the current directory. Missing files are ignored.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = HealConfig::default();
        assert!(!config.suggester.is_configured());
        assert!(config.healing.external_fallback);
        assert_eq!(config.general.default_limit, 20);
        config.validate().unwrap();
    }

    #[test]
    fn command_rerun_needs_a_program() {
        let mut config = HealConfig::default();
        config.healing.rerun = RerunMode::Command;
        config.healing.rerun_command.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("healing.rerun_command"), "{err}");
    }

    #[test]
    fn temperature_out_of_range_is_rejected() {
        let mut config = HealConfig::default();
        config.suggester.temperature = 3.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "suggester.temperature"
        ));
    }
}
