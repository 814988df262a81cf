//! Feed assembly configuration

use serde::Deserialize;

use super::error::ValidationError;

const MAX_ANALYSIS_CONCURRENCY: usize = 32;

/// Feed assembly settings
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Proposals analyzed at once; 1 analyzes them one after another
    #[serde(default = "default_concurrency")]
    pub analysis_concurrency: usize,
}

impl FeedConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.analysis_concurrency == 0 || self.analysis_concurrency > MAX_ANALYSIS_CONCURRENCY {
            return Err(ValidationError::InvalidConcurrency);
        }
        Ok(())
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            analysis_concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    1
}
