//! In-Memory Governance Data Provider
//!
//! Serves canned GraphQL responses. Useful for testing and dry runs.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::tally_client::retain_historical;
use crate::ports::{GovernanceDataProvider, GovernanceError};

/// A recorded call against the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GovernanceCall {
    Organization { slug: String },
    Proposals { organization_id: String, include_active: bool },
}

/// Which operation should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    Organization,
    Proposals,
}

/// In-memory provider keyed by DAO slug and organization id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGovernanceProvider {
    organizations: HashMap<String, Value>,
    proposals: HashMap<String, Value>,
    failure: Option<InjectedFailure>,
    calls: Arc<RwLock<Vec<GovernanceCall>>>,
}

impl InMemoryGovernanceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a DAO with well-formed organization and proposals responses.
    pub fn with_dao(
        self,
        slug: impl Into<String>,
        organization_id: impl Into<String>,
        name: impl Into<String>,
        proposal_nodes: Vec<Value>,
    ) -> Self {
        let slug = slug.into();
        let organization_id = organization_id.into();
        let organization = json!({
            "data": {"organization": {"id": organization_id, "name": name.into(), "slug": slug}}
        });
        let proposals = json!({"data": {"proposals": {"nodes": proposal_nodes}}});

        self.with_organization_response(slug, organization)
            .with_proposals_response(organization_id, proposals)
    }

    /// Sets the raw organization response for a slug.
    pub fn with_organization_response(mut self, slug: impl Into<String>, response: Value) -> Self {
        self.organizations.insert(slug.into(), response);
        self
    }

    /// Sets the raw proposals response for an organization id.
    pub fn with_proposals_response(
        mut self,
        organization_id: impl Into<String>,
        response: Value,
    ) -> Self {
        self.proposals.insert(organization_id.into(), response);
        self
    }

    /// Makes every call of the given kind fail with a network error.
    pub fn with_failure(mut self, failure: InjectedFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Get all recorded calls
    pub async fn calls(&self) -> Vec<GovernanceCall> {
        self.calls.read().await.clone()
    }

    /// Get the number of recorded calls
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    fn injected(&self, kind: InjectedFailure) -> Result<(), GovernanceError> {
        match self.failure {
            Some(failure) if failure == kind => Err(GovernanceError::network("injected failure")),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl GovernanceDataProvider for InMemoryGovernanceProvider {
    async fn get_organization(&self, slug: &str) -> Result<Option<Value>, GovernanceError> {
        self.calls.write().await.push(GovernanceCall::Organization {
            slug: slug.to_string(),
        });
        self.injected(InjectedFailure::Organization)?;

        Ok(self.organizations.get(slug).cloned())
    }

    async fn get_proposals(
        &self,
        organization_id: &str,
        include_active: bool,
    ) -> Result<Option<Value>, GovernanceError> {
        self.calls.write().await.push(GovernanceCall::Proposals {
            organization_id: organization_id.to_string(),
            include_active,
        });
        self.injected(InjectedFailure::Proposals)?;

        let mut response = self.proposals.get(organization_id).cloned();
        if !include_active {
            if let Some(response) = response.as_mut() {
                retain_historical(response);
            }
        }
        Ok(response)
    }
}
