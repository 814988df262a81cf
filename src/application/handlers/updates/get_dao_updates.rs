//! GetDaoUpdatesHandler - Query handler that assembles a DAO's update feed.
//!
//! Fetches the organization and its historical proposals, analyzes each
//! proposal, turns each analysis into a `DaoUpdate` and returns the feed
//! ordered by priority.

use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::adapters::ai::{OpenAIConfig, OpenAIProvider};
use crate::adapters::impact::LlmImpactAnalyzer;
use crate::adapters::tally::{TallyClient, TallyConfig};
use crate::config::{AppConfig, ConfigError, ValidationError as ConfigValidationError};
use crate::config::{OPENAI_API_KEY_VAR, TALLY_API_KEY_VAR};
use crate::domain::foundation::{Timestamp, ValidationError};
use crate::domain::governance::{decode_organization, decode_proposals, Organization, Proposal};
use crate::domain::updates::{rank_updates, synthesize_proposal_update, DaoUpdate};
use crate::ports::{
    AIProvider, GovernanceDataProvider, GovernanceError, ImpactAnalyzer, RequestMetadata,
};

/// Token holdings of the requesting user, keyed by token symbol.
pub type UserHoldings = HashMap<String, Value>;

/// Query to get the update feed for one DAO.
#[derive(Debug, Clone)]
pub struct GetDaoUpdatesQuery {
    /// The DAO's slug on the data provider.
    pub dao_slug: String,
    /// Accepted for future personalization; does not affect the feed.
    pub user_holdings: Option<UserHoldings>,
}

impl GetDaoUpdatesQuery {
    pub fn new(dao_slug: impl Into<String>) -> Self {
        Self {
            dao_slug: dao_slug.into(),
            user_holdings: None,
        }
    }

    pub fn with_holdings(mut self, holdings: UserHoldings) -> Self {
        self.user_holdings = Some(holdings);
        self
    }
}

/// Result of a feed query: updates ordered urgent, important, fyi.
pub type GetDaoUpdatesResult = Vec<DaoUpdate>;

/// Reasons a feed build is abandoned. Never leaves the handler.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("no organization found for DAO '{0}'")]
    OrganizationNotFound(String),

    #[error("data provider error: {0}")]
    Provider(#[from] GovernanceError),

    #[error("malformed {what} response: {source}")]
    Malformed {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid update: {0}")]
    InvalidUpdate(#[from] ValidationError),
}

/// Handler for assembling DAO update feeds.
pub struct GetDaoUpdatesHandler {
    provider: Arc<dyn GovernanceDataProvider>,
    analyzer: Arc<dyn ImpactAnalyzer>,
    concurrency: usize,
}

impl GetDaoUpdatesHandler {
    pub fn new(provider: Arc<dyn GovernanceDataProvider>, analyzer: Arc<dyn ImpactAnalyzer>) -> Self {
        Self {
            provider,
            analyzer,
            concurrency: 1,
        }
    }

    /// Sets how many proposals are analyzed at once. Values below 1 mean 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Wires the Tally client and LLM analyzer from configuration.
    ///
    /// The generation provider is used as given when supplied; otherwise an
    /// OpenAI provider is built from `ai.openai_api_key`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required credential is missing or an
    /// HTTP client cannot be built.
    pub fn from_config(
        config: &AppConfig,
        ai_provider: Option<Arc<dyn AIProvider>>,
    ) -> Result<Self, ConfigError> {
        let tally_key = config
            .tally
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigValidationError::MissingRequired(TALLY_API_KEY_VAR))?;

        let tally = TallyClient::new(
            TallyConfig::new(tally_key)
                .with_base_url(&config.tally.base_url)
                .with_timeout(config.tally.timeout())
                .with_proposals_limit(config.tally.proposals_limit),
        )
        .map_err(|e| ConfigError::AdapterInit {
            component: "Tally client",
            message: e.to_string(),
        })?;

        let ai_provider: Arc<dyn AIProvider> = match ai_provider {
            Some(provider) => provider,
            None => {
                let openai_key = config
                    .ai
                    .openai_api_key
                    .clone()
                    .filter(|k| !k.is_empty())
                    .ok_or(ConfigValidationError::MissingRequired(OPENAI_API_KEY_VAR))?;

                let provider = OpenAIProvider::new(
                    OpenAIConfig::new(openai_key)
                        .with_model(&config.ai.model)
                        .with_base_url(&config.ai.base_url)
                        .with_timeout(config.ai.timeout())
                        .with_max_retries(config.ai.max_retries),
                )
                .map_err(|e| ConfigError::AdapterInit {
                    component: "OpenAI provider",
                    message: e.to_string(),
                })?;
                Arc::new(provider)
            }
        };

        let analyzer = LlmImpactAnalyzer::new(ai_provider)
            .with_timeout(config.ai.timeout())
            .with_temperature(config.ai.temperature);

        Ok(Self::new(Arc::new(tally), Arc::new(analyzer))
            .with_concurrency(config.feed.analysis_concurrency))
    }

    /// Builds the feed for one DAO. Never fails: any error is logged and
    /// yields an empty feed.
    #[tracing::instrument(skip(self, query), fields(dao_slug = %query.dao_slug))]
    pub async fn handle(&self, query: GetDaoUpdatesQuery) -> GetDaoUpdatesResult {
        tracing::info!("getting updates for DAO");

        match self.build_feed(&query.dao_slug).await {
            Ok(updates) => {
                tracing::info!(count = updates.len(), "generated updates for DAO");
                updates
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to get DAO updates");
                Vec::new()
            }
        }
    }

    /// Builds the feeds for several DAOs and merges them into one ranked feed.
    ///
    /// Updates of equal priority keep the order of `dao_slugs`. A slug listed
    /// more than once is built only at its first position.
    pub async fn handle_many(
        &self,
        dao_slugs: &[String],
        user_holdings: Option<UserHoldings>,
    ) -> GetDaoUpdatesResult {
        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        for slug in dao_slugs {
            if !seen.insert(slug.as_str()) {
                tracing::debug!(dao_slug = %slug, "skipping repeated DAO slug");
                continue;
            }
            let query = GetDaoUpdatesQuery {
                dao_slug: slug.clone(),
                user_holdings: user_holdings.clone(),
            };
            merged.extend(self.handle(query).await);
        }
        rank_updates(merged)
    }

    async fn build_feed(&self, dao_slug: &str) -> Result<Vec<DaoUpdate>, FeedError> {
        let organization = self.fetch_organization(dao_slug).await?;
        let proposals = self.fetch_historical_proposals(&organization.id).await?;
        tracing::debug!(
            organization_id = %organization.id,
            proposals = proposals.len(),
            "fetched proposals"
        );

        let trace_id = uuid::Uuid::new_v4().to_string();
        let dao_name = organization.name.as_str();

        let mut pending = Vec::with_capacity(proposals.len());
        for proposal in &proposals {
            let context = RequestMetadata::new(trace_id.as_str())
                .with_dao_slug(dao_slug)
                .with_proposal_id(proposal.id.as_str());
            pending.push(self.proposal_update(dao_slug, dao_name, proposal, context));
        }

        let results: Vec<Result<DaoUpdate, ValidationError>> = stream::iter(pending)
            .buffered(self.concurrency)
            .collect()
            .await;

        let updates = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(rank_updates(updates))
    }

    async fn proposal_update(
        &self,
        dao_slug: &str,
        dao_name: &str,
        proposal: &Proposal,
        context: RequestMetadata,
    ) -> Result<DaoUpdate, ValidationError> {
        let impact = self.analyzer.analyze(&proposal.metadata, context).await;
        if impact.is_fallback() {
            tracing::warn!(proposal_id = %proposal.id, summary = impact.summary(), "using fallback impact analysis");
        }
        synthesize_proposal_update(dao_slug, dao_name, proposal, &impact, Timestamp::now())
    }

    async fn fetch_organization(&self, dao_slug: &str) -> Result<Organization, FeedError> {
        let not_found = || FeedError::OrganizationNotFound(dao_slug.to_string());

        let response = self.provider.get_organization(dao_slug).await?.ok_or_else(not_found)?;
        decode_organization(response)
            .map_err(|source| FeedError::Malformed {
                what: "organization",
                source,
            })?
            .ok_or_else(not_found)
    }

    async fn fetch_historical_proposals(
        &self,
        organization_id: &str,
    ) -> Result<Vec<Proposal>, FeedError> {
        match self.provider.get_proposals(organization_id, false).await? {
            Some(response) => decode_proposals(response).map_err(|source| FeedError::Malformed {
                what: "proposals",
                source,
            }),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::tally::{GovernanceCall, InMemoryGovernanceProvider, InjectedFailure};
    use crate::domain::governance::ProposalMetadata;
    use crate::domain::updates::{ImpactAnalysis, RiskLevel, UpdateCategory, UpdatePriority};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    // ─────────────────────────────────────────────────────────────────────
    // Test Analyzer
    // ─────────────────────────────────────────────────────────────────────

    /// Returns a fixed risk per proposal title and records the contexts it saw.
    struct ScriptedAnalyzer {
        risks: HashMap<String, RiskLevel>,
        contexts: Mutex<Vec<RequestMetadata>>,
    }

    impl ScriptedAnalyzer {
        fn new(risks: &[(&str, RiskLevel)]) -> Self {
            Self {
                risks: risks
                    .iter()
                    .map(|(title, risk)| (title.to_string(), *risk))
                    .collect(),
                contexts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ImpactAnalyzer for ScriptedAnalyzer {
        async fn analyze(&self, proposal: &ProposalMetadata, context: RequestMetadata) -> ImpactAnalysis {
            self.contexts.lock().unwrap().push(context);
            let risk = self
                .risks
                .get(proposal.title_or_placeholder())
                .copied()
                .unwrap_or_default();
            ImpactAnalysis::normalized(
                format!("impact of {}", proposal.title_or_placeholder()),
                vec!["Governance".to_string()],
                Some(risk),
            )
        }
    }

    fn node(id: &str, title: &str) -> Value {
        json!({"id": id, "metadata": {"title": title, "description": "d"}})
    }

    fn handler(provider: InMemoryGovernanceProvider, analyzer: ScriptedAnalyzer) -> GetDaoUpdatesHandler {
        GetDaoUpdatesHandler::new(Arc::new(provider), Arc::new(analyzer))
    }

    #[tokio::test]
    async fn builds_ranked_feed_from_historical_proposals() {
        let provider = InMemoryGovernanceProvider::new().with_dao(
            "test-dao",
            "org1",
            "Test DAO",
            vec![node("1", "Low"), node("2", "High"), node("3", "Medium")],
        );
        let analyzer = ScriptedAnalyzer::new(&[
            ("Low", RiskLevel::Low),
            ("High", RiskLevel::High),
            ("Medium", RiskLevel::Medium),
        ]);

        let feed = handler(provider, analyzer)
            .handle(GetDaoUpdatesQuery::new("test-dao"))
            .await;

        let ids: Vec<&str> = feed.iter().map(|u| u.id()).collect();
        assert_eq!(ids, vec!["prop_2", "prop_1", "prop_3"]);
        assert_eq!(feed[0].priority(), UpdatePriority::Urgent);
        assert!(feed.iter().all(|u| u.dao_name() == "Test DAO"));
        assert!(feed.iter().all(|u| u.category() == UpdateCategory::Proposal));
    }

    #[tokio::test]
    async fn requests_historical_proposals_only() {
        let provider = InMemoryGovernanceProvider::new().with_dao("d", "org1", "D", vec![]);
        let handler = GetDaoUpdatesHandler::new(
            Arc::new(provider.clone()),
            Arc::new(ScriptedAnalyzer::new(&[])),
        );

        handler.handle(GetDaoUpdatesQuery::new("d")).await;

        assert_eq!(
            provider.calls().await[1],
            GovernanceCall::Proposals {
                organization_id: "org1".to_string(),
                include_active: false
            }
        );
    }

    #[tokio::test]
    async fn missing_organization_yields_empty_feed() {
        let provider = InMemoryGovernanceProvider::new()
            .with_organization_response("ghost", json!({"errors": [{"message": "not found"}]}));

        let feed = handler(provider, ScriptedAnalyzer::new(&[]))
            .handle(GetDaoUpdatesQuery::new("ghost"))
            .await;

        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn malformed_organization_yields_empty_feed() {
        let provider = InMemoryGovernanceProvider::new()
            .with_organization_response("bad", json!({"data": {"organization": {"id": "1"}}}));

        let feed = handler(provider, ScriptedAnalyzer::new(&[]))
            .handle(GetDaoUpdatesQuery::new("bad"))
            .await;

        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_yields_empty_feed() {
        let provider = InMemoryGovernanceProvider::new()
            .with_dao("d", "o", "D", vec![node("1", "t")])
            .with_failure(InjectedFailure::Proposals);

        let feed = handler(provider, ScriptedAnalyzer::new(&[]))
            .handle(GetDaoUpdatesQuery::new("d"))
            .await;

        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn proposals_without_data_yield_empty_feed() {
        let provider = InMemoryGovernanceProvider::new()
            .with_organization_response(
                "d",
                json!({"data": {"organization": {"id": "o", "name": "D"}}}),
            )
            .with_proposals_response("o", json!({"errors": []}));

        let feed = handler(provider, ScriptedAnalyzer::new(&[]))
            .handle(GetDaoUpdatesQuery::new("d"))
            .await;

        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn analyzer_receives_shared_trace_id_and_proposal_context() {
        let provider = InMemoryGovernanceProvider::new().with_dao(
            "d",
            "o",
            "D",
            vec![node("1", "a"), node("2", "b")],
        );
        let analyzer = Arc::new(ScriptedAnalyzer::new(&[]));
        let handler = GetDaoUpdatesHandler::new(Arc::new(provider), analyzer.clone());

        handler.handle(GetDaoUpdatesQuery::new("d")).await;

        let contexts = analyzer.contexts.lock().unwrap();
        assert_eq!(contexts.len(), 2);
        assert_eq!(contexts[0].trace_id, contexts[1].trace_id);
        assert_eq!(contexts[0].dao_slug.as_deref(), Some("d"));
        assert_eq!(contexts[0].proposal_id.as_deref(), Some("1"));
        assert_eq!(contexts[1].proposal_id.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn concurrent_analysis_keeps_received_order_for_ties() {
        let nodes: Vec<Value> = (1..=6).map(|i| node(&i.to_string(), "same")).collect();
        let provider = InMemoryGovernanceProvider::new().with_dao("d", "o", "D", nodes);

        let feed = handler(provider, ScriptedAnalyzer::new(&[]))
            .with_concurrency(4)
            .handle(GetDaoUpdatesQuery::new("d"))
            .await;

        let ids: Vec<&str> = feed.iter().map(|u| u.id()).collect();
        assert_eq!(ids, vec!["prop_1", "prop_2", "prop_3", "prop_4", "prop_5", "prop_6"]);
    }

    #[tokio::test]
    async fn handle_many_merges_and_ranks_feeds() {
        let provider = InMemoryGovernanceProvider::new()
            .with_dao("a", "1", "A", vec![node("a1", "calm"), node("a2", "risky")])
            .with_dao("b", "2", "B", vec![node("b1", "risky"), node("b2", "calm")]);
        let analyzer = ScriptedAnalyzer::new(&[("risky", RiskLevel::High), ("calm", RiskLevel::Low)]);

        let feed = handler(provider, analyzer)
            .handle_many(&["a".to_string(), "missing".to_string(), "b".to_string()], None)
            .await;

        let ids: Vec<&str> = feed.iter().map(|u| u.id()).collect();
        assert_eq!(ids, vec!["prop_a2", "prop_b1", "prop_a1", "prop_b2"]);
    }

    #[tokio::test]
    async fn handle_many_builds_each_dao_once() {
        let provider = InMemoryGovernanceProvider::new()
            .with_dao("u", "1", "U", vec![node("7", "t")])
            .with_dao("v", "2", "V", vec![node("8", "t")]);
        let calls = provider.clone();

        let slugs = ["u", "v", "u"].map(str::to_string);
        let feed = handler(provider, ScriptedAnalyzer::new(&[]))
            .handle_many(&slugs, None)
            .await;

        let ids: Vec<&str> = feed.iter().map(|u| u.id()).collect();
        assert_eq!(ids, vec!["prop_7", "prop_8"]);
        let organization_lookups = calls
            .calls()
            .await
            .into_iter()
            .filter(|c| matches!(c, GovernanceCall::Organization { .. }))
            .count();
        assert_eq!(organization_lookups, 2);
    }

    #[tokio::test]
    async fn holdings_do_not_change_the_feed() {
        let provider = InMemoryGovernanceProvider::new().with_dao("d", "o", "D", vec![node("1", "t")]);
        let handler = handler(provider, ScriptedAnalyzer::new(&[]));

        let plain = handler.handle(GetDaoUpdatesQuery::new("d")).await;
        let holdings = HashMap::from([("UNI".to_string(), json!(100))]);
        let personalized = handler
            .handle(GetDaoUpdatesQuery::new("d").with_holdings(holdings))
            .await;

        let ids = |feed: &[DaoUpdate]| feed.iter().map(|u| u.id().to_string()).collect::<Vec<_>>();
        assert_eq!(ids(&plain), ids(&personalized));
    }

    #[tokio::test]
    async fn llm_failure_still_produces_important_update() {
        let provider = InMemoryGovernanceProvider::new().with_dao("d", "o", "D", vec![node("7", "t")]);
        let ai = MockAIProvider::new().with_error(MockError::Network {
            message: "reset".to_string(),
        });
        let handler = GetDaoUpdatesHandler::new(
            Arc::new(provider),
            Arc::new(LlmImpactAnalyzer::new(Arc::new(ai))),
        );

        let feed = handler.handle(GetDaoUpdatesQuery::new("d")).await;

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].description(), "Error analyzing proposal");
        assert_eq!(feed[0].priority(), UpdatePriority::Important);
    }

    #[test]
    fn from_config_requires_tally_key() {
        let config = AppConfig::default();
        let ai: Arc<dyn AIProvider> = Arc::new(MockAIProvider::new());

        let result = GetDaoUpdatesHandler::from_config(&config, Some(ai));

        assert!(matches!(
            result,
            Err(ConfigError::ValidationFailed(ConfigValidationError::MissingRequired("TALLY_API_KEY")))
        ));
    }

    #[test]
    fn from_config_requires_openai_key_without_injected_provider() {
        let mut config = AppConfig::default();
        config.tally.api_key = Some("tally".to_string());

        let result = GetDaoUpdatesHandler::from_config(&config, None);

        assert!(matches!(
            result,
            Err(ConfigError::ValidationFailed(ConfigValidationError::MissingRequired("OPENAI_API_KEY")))
        ));
    }

    #[test]
    fn from_config_accepts_injected_provider() {
        let mut config = AppConfig::default();
        config.tally.api_key = Some("tally".to_string());
        let ai: Arc<dyn AIProvider> = Arc::new(MockAIProvider::new());

        assert!(GetDaoUpdatesHandler::from_config(&config, Some(ai)).is_ok());
    }

    #[test]
    fn from_config_builds_openai_provider_from_key() {
        let mut config = AppConfig::default();
        config.tally.api_key = Some("tally".to_string());
        config.ai.openai_api_key = Some("sk-test".to_string());

        assert!(GetDaoUpdatesHandler::from_config(&config, None).is_ok());
    }
}
