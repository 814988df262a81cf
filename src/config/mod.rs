//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `DAO_PULSE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use dao_pulse::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Analyzing with {}", config.ai.model);
//! ```

mod ai;
mod error;
mod feed;
mod server;
mod tally;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use feed::FeedConfig;
pub use server::{LogFormat, ServerConfig};
pub use tally::TallyApiConfig;

use serde::Deserialize;

/// Plain environment variable consulted when no OpenAI key is configured.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Plain environment variable consulted when no Tally key is configured.
pub const TALLY_API_KEY_VAR: &str = "TALLY_API_KEY";

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Tally data provider configuration
    #[serde(default)]
    pub tally: TallyApiConfig,

    /// AI provider configuration (OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Feed assembly settings
    #[serde(default)]
    pub feed: FeedConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DAO_PULSE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Fills missing credentials from `OPENAI_API_KEY` / `TALLY_API_KEY`
    ///
    /// # Environment Variable Format
    ///
    /// - `DAO_PULSE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `DAO_PULSE__TALLY__API_KEY=...` -> `tally.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DAO_PULSE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config.with_credential_fallbacks(|name| std::env::var(name).ok()))
    }

    /// Fills unset credentials from plain variables resolved by `lookup`.
    pub fn with_credential_fallbacks(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if !self.ai.has_openai() {
            self.ai.openai_api_key = lookup(OPENAI_API_KEY_VAR).filter(|k| !k.is_empty());
        }
        if !self.tally.has_api_key() {
            self.tally.api_key = lookup(TALLY_API_KEY_VAR).filter(|k| !k.is_empty());
        }
        self
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - Port and timeout ranges
    /// - URL schemes
    /// - Temperature and concurrency bounds
    ///
    /// Credentials are checked when the feed handler is built.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.tally.validate()?;
        self.ai.validate()?;
        self.feed.validate()?;
        Ok(())
    }
}
