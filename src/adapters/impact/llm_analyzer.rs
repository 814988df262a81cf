//! AI-powered ImpactAnalyzer implementation

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::governance::ProposalMetadata;
use crate::domain::updates::{impact_prompt, parse_impact_response, ImpactAnalysis};
use crate::ports::{AIProvider, CompletionRequest, ImpactAnalyzer, MessageRole, RequestMetadata};

/// Text substituted for the model output when generation fails.
pub const GENERATION_FAILED_TEXT: &str = "Error: Failed to generate AI response";

/// Text substituted when the model answers with nothing.
pub const EMPTY_RESPONSE_TEXT: &str = "Error: No response from AI";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Impact analyzer backed by a text-generation provider.
pub struct LlmImpactAnalyzer {
    ai_provider: Arc<dyn AIProvider>,
    timeout: Duration,
    temperature: f32,
}

impl LlmImpactAnalyzer {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self {
            ai_provider,
            timeout: DEFAULT_TIMEOUT,
            temperature: 0.0,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Runs one completion and returns its text, or a failure line.
    ///
    /// The failure lines are single lines, so the parser reports them as
    /// format violations.
    async fn generate(&self, prompt: String, context: RequestMetadata) -> String {
        let request = CompletionRequest::new(context)
            .with_message(MessageRole::User, prompt)
            .with_temperature(self.temperature);

        match tokio::time::timeout(self.timeout, self.ai_provider.complete(request)).await {
            Ok(Ok(response)) if response.content.trim().is_empty() => {
                tracing::warn!("generation service returned empty content");
                EMPTY_RESPONSE_TEXT.to_string()
            }
            Ok(Ok(response)) => {
                tracing::debug!(
                    model = %response.model,
                    prompt_tokens = response.usage.prompt_tokens,
                    completion_tokens = response.usage.completion_tokens,
                    finish_reason = ?response.finish_reason,
                    "impact generation completed"
                );
                response.content
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "impact generation failed");
                GENERATION_FAILED_TEXT.to_string()
            }
            Err(_) => {
                tracing::error!(
                    timeout_secs = self.timeout.as_secs(),
                    "impact generation timed out"
                );
                GENERATION_FAILED_TEXT.to_string()
            }
        }
    }
}

#[async_trait]
impl ImpactAnalyzer for LlmImpactAnalyzer {
    #[tracing::instrument(
        skip(self, proposal, context),
        fields(trace_id = %context.trace_id, proposal_id = ?context.proposal_id)
    )]
    async fn analyze(&self, proposal: &ProposalMetadata, context: RequestMetadata) -> ImpactAnalysis {
        let title = proposal.title_or_placeholder();
        let description = proposal.description_or_placeholder();

        if title.trim().is_empty() || description.trim().is_empty() {
            tracing::debug!("proposal has blank title or description, skipping generation");
            return ImpactAnalysis::no_valid_data();
        }

        let response = self.generate(impact_prompt(title, description), context).await;
        let parsed = parse_impact_response(&response);

        if parsed.is_violation() {
            tracing::warn!(response = %response, "impact response did not have three lines");
        }

        parsed.into_analysis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::updates::{
        RiskLevel, ANALYSIS_FAILED_SUMMARY, EMPTY_SUMMARY_FALLBACK, NO_VALID_DATA_SUMMARY,
        UNKNOWN_AREA,
    };

    fn analyzer(provider: MockAIProvider) -> LlmImpactAnalyzer {
        LlmImpactAnalyzer::new(Arc::new(provider))
    }

    fn metadata() -> RequestMetadata {
        RequestMetadata::new("trace-1").with_proposal_id("42")
    }

    #[tokio::test]
    async fn parses_well_formed_response() {
        let provider = MockAIProvider::new()
            .with_response("Summary: Moves funds to staking\nAreas: Treasury, Risk Management\nRisk: medium");
        let analyzer = analyzer(provider);

        let analysis = analyzer
            .analyze(&ProposalMetadata::new("Stake treasury", "Move 10%"), metadata())
            .await;

        assert_eq!(analysis.summary(), "Moves funds to staking");
        assert_eq!(analysis.affected_areas(), ["Treasury", "Risk Management"]);
        assert_eq!(analysis.risk_level(), RiskLevel::Medium);
    }

    #[tokio::test]
    async fn sends_prompt_at_configured_temperature() {
        let provider = MockAIProvider::new();
        let analyzer = analyzer(provider.clone());

        analyzer
            .analyze(&ProposalMetadata::new("Fee switch", "Turn fees on"), metadata())
            .await;

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].temperature, Some(0.0));
        assert!(calls[0].messages[0].content.contains("Proposal Title: Fee switch"));
        assert_eq!(calls[0].metadata.proposal_id.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn blank_title_skips_generation() {
        let provider = MockAIProvider::new();
        let analyzer = analyzer(provider.clone());

        let analysis = analyzer
            .analyze(&ProposalMetadata::new("   ", "Some description"), metadata())
            .await;

        assert_eq!(analysis.summary(), NO_VALID_DATA_SUMMARY);
        assert_eq!(analysis.affected_areas(), [UNKNOWN_AREA]);
        assert_eq!(analysis.risk_level(), RiskLevel::Medium);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_fields_use_placeholders() {
        let provider = MockAIProvider::new();
        let analyzer = analyzer(provider.clone());

        analyzer.analyze(&ProposalMetadata::default(), metadata()).await;

        let prompt = &provider.get_calls()[0].messages[0].content;
        assert!(prompt.contains("Proposal Title: Unknown Proposal"));
        assert!(prompt.contains("Description: No description available."));
    }

    #[tokio::test]
    async fn provider_error_degrades_to_failure_analysis() {
        let provider = MockAIProvider::new().with_error(MockError::Unavailable {
            message: "down".to_string(),
        });
        let analyzer = analyzer(provider);

        let analysis = analyzer
            .analyze(&ProposalMetadata::new("t", "d"), metadata())
            .await;

        assert_eq!(analysis.summary(), ANALYSIS_FAILED_SUMMARY);
        assert_eq!(analysis.affected_areas(), [UNKNOWN_AREA]);
        assert_eq!(analysis.risk_level(), RiskLevel::Medium);
    }

    #[tokio::test]
    async fn empty_response_degrades_to_failure_analysis() {
        let analyzer = analyzer(MockAIProvider::new().with_response("  "));

        let analysis = analyzer
            .analyze(&ProposalMetadata::new("t", "d"), metadata())
            .await;

        assert_eq!(analysis.summary(), ANALYSIS_FAILED_SUMMARY);
    }

    #[tokio::test]
    async fn timeout_degrades_to_failure_analysis() {
        let provider = MockAIProvider::new().with_delay(Duration::from_millis(200));
        let analyzer = analyzer(provider).with_timeout(Duration::from_millis(10));

        let analysis = analyzer
            .analyze(&ProposalMetadata::new("t", "d"), metadata())
            .await;

        assert_eq!(analysis.summary(), ANALYSIS_FAILED_SUMMARY);
    }

    #[tokio::test]
    async fn normalizes_empty_fields_and_unknown_risk() {
        let analyzer = analyzer(MockAIProvider::new().with_response("Summary:\nAreas:\nRisk: catastrophic"));

        let analysis = analyzer
            .analyze(&ProposalMetadata::new("t", "d"), metadata())
            .await;

        assert_eq!(analysis.summary(), EMPTY_SUMMARY_FALLBACK);
        assert_eq!(analysis.affected_areas(), [UNKNOWN_AREA]);
        assert_eq!(analysis.risk_level(), RiskLevel::Medium);
    }

    #[tokio::test]
    async fn high_risk_is_case_insensitive() {
        let analyzer = analyzer(MockAIProvider::new().with_response("Summary: s\nAreas: Treasury\nRisk: HIGH"));

        let analysis = analyzer
            .analyze(&ProposalMetadata::new("t", "d"), metadata())
            .await;

        assert_eq!(analysis.risk_level(), RiskLevel::High);
    }
}
