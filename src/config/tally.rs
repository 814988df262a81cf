//! Tally data provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::{validate_http_url, ValidationError};

/// Tally API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TallyApiConfig {
    /// Tally API key (falls back to `TALLY_API_KEY`)
    pub api_key: Option<String>,

    /// GraphQL endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Page size for proposal queries
    #[serde(default = "default_proposals_limit")]
    pub proposals_limit: u32,
}

impl TallyApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.proposals_limit == 0 || self.proposals_limit > 100 {
            return Err(ValidationError::InvalidProposalsLimit);
        }
        validate_http_url("tally.base_url", &self.base_url)
    }
}

impl Default for TallyApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            proposals_limit: default_proposals_limit(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.tally.xyz/query".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_proposals_limit() -> u32 {
    20
}
