//! Tally Client - Implementation of GovernanceDataProvider for Tally's GraphQL API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = TallyConfig::new(api_key)
//!     .with_base_url("https://api.tally.xyz/query")
//!     .with_proposals_limit(20);
//!
//! let client = TallyClient::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::ports::{GovernanceDataProvider, GovernanceError};

const ORGANIZATION_QUERY: &str = r#"
query Organization($slug: String!) {
  organization(input: { slug: $slug }) {
    id
    name
    slug
  }
}
"#;

const PROPOSALS_QUERY: &str = r#"
query Proposals($organizationId: IntID!, $limit: Int!) {
  proposals(input: { filters: { organizationId: $organizationId }, page: { limit: $limit } }) {
    nodes {
      ... on Proposal {
        id
        status
        metadata {
          title
          description
        }
        voteStats {
          type
          votesCount
          votersCount
          percent
        }
      }
    }
  }
}
"#;

/// Proposal statuses that count as in-flight rather than historical.
const ACTIVE_STATUSES: &[&str] = &["active", "pending"];

/// Configuration for the Tally client.
#[derive(Debug, Clone)]
pub struct TallyConfig {
    api_key: Secret<String>,
    /// GraphQL endpoint (default: https://api.tally.xyz/query).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Page size for proposal queries.
    pub proposals_limit: u32,
}

impl TallyConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.tally.xyz/query".to_string(),
            timeout: Duration::from_secs(30),
            proposals_limit: 20,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proposals_limit(mut self, limit: u32) -> Self {
        self.proposals_limit = limit;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Tally GraphQL client.
pub struct TallyClient {
    config: TallyConfig,
    client: Client,
}

impl TallyClient {
    pub fn new(config: TallyConfig) -> Result<Self, GovernanceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GovernanceError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    async fn query(&self, query: &'static str, variables: Value) -> Result<Value, GovernanceError> {
        let body = GraphQLRequest { query, variables };

        let response = self
            .client
            .post(&self.config.base_url)
            .header("Api-Key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GovernanceError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    GovernanceError::network(e.to_string())
                }
            })?;

        let response = Self::handle_response_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| GovernanceError::parse(format!("Failed to parse response: {}", e)))
    }

    async fn handle_response_status(response: Response) -> Result<Response, GovernanceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(GovernanceError::AuthenticationFailed),
            429 => Err(GovernanceError::RateLimited),
            code => Err(GovernanceError::UnexpectedStatus { status: code, body }),
        }
    }
}

/// Drops in-flight proposals from a proposals response, in place.
pub(super) fn retain_historical(response: &mut Value) {
    if let Some(nodes) = response
        .pointer_mut("/data/proposals/nodes")
        .and_then(Value::as_array_mut)
    {
        nodes.retain(|node| {
            let status = node
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_lowercase();
            !ACTIVE_STATUSES.contains(&status.as_str())
        });
    }
}

/// Logs GraphQL-level errors; the data that came with them is still returned.
fn log_graphql_errors(response: &Value) {
    if let Some(errors) = response.get("errors").and_then(Value::as_array) {
        let count = errors.len();
        let errors = Value::Array(errors.clone());
        tracing::warn!(count, errors = %errors, "Tally returned GraphQL errors");
    }
}

#[async_trait]
impl GovernanceDataProvider for TallyClient {
    async fn get_organization(&self, slug: &str) -> Result<Option<Value>, GovernanceError> {
        tracing::debug!(dao_slug = %slug, "fetching organization");

        let response = self.query(ORGANIZATION_QUERY, json!({ "slug": slug })).await?;
        log_graphql_errors(&response);

        Ok(Some(response))
    }

    async fn get_proposals(
        &self,
        organization_id: &str,
        include_active: bool,
    ) -> Result<Option<Value>, GovernanceError> {
        tracing::debug!(organization_id = %organization_id, include_active, "fetching proposals");

        let variables = json!({
            "organizationId": organization_id,
            "limit": self.config.proposals_limit,
        });
        let mut response = self.query(PROPOSALS_QUERY, variables).await?;
        log_graphql_errors(&response);

        if !include_active {
            retain_historical(&mut response);
        }

        Ok(Some(response))
    }
}

// ----- GraphQL wire types -----

#[derive(Debug, Serialize)]
struct GraphQLRequest {
    query: &'static str,
    variables: Value,
}
