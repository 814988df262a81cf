//! Governance Data Provider Port - Interface to the DAO data source.
//!
//! Responses are returned as raw GraphQL JSON. A provider that answered but
//! had nothing to say returns `Ok(None)`; decoding into
//! [`Organization`](crate::domain::governance::Organization) and
//! [`Proposal`](crate::domain::governance::Proposal) happens in the caller so
//! malformed payloads are handled in one place.

use async_trait::async_trait;
use serde_json::Value;

/// Port for fetching organizations and proposals.
#[async_trait]
pub trait GovernanceDataProvider: Send + Sync {
    /// Fetches `{data: {organization: {id, name}}}` for a DAO slug.
    async fn get_organization(&self, slug: &str) -> Result<Option<Value>, GovernanceError>;

    /// Fetches `{data: {proposals: {nodes: [...]}}}` for an organization.
    ///
    /// With `include_active = false` only historical (non-active) proposals
    /// are returned.
    async fn get_proposals(
        &self,
        organization_id: &str,
        include_active: bool,
    ) -> Result<Option<Value>, GovernanceError>;
}

/// Data provider errors.
#[derive(Debug, thiserror::Error)]
pub enum GovernanceError {
    /// API key rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Rate limited by the provider.
    #[error("rate limited by data provider")]
    RateLimited,

    /// Provider answered with an unexpected status.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Response body was not JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl GovernanceError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn governance_error_displays_correctly() {
        let err = GovernanceError::UnexpectedStatus {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected status 502: bad gateway");
        assert_eq!(
            GovernanceError::Timeout { timeout_secs: 15 }.to_string(),
            "request timed out after 15s"
        );
    }
}
