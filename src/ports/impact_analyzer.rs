//! ImpactAnalyzer port for turning proposal text into an impact analysis

use async_trait::async_trait;

use crate::domain::governance::ProposalMetadata;
use crate::domain::updates::ImpactAnalysis;
use crate::ports::RequestMetadata;

/// Analyzer for a single proposal's impact.
///
/// Total by contract: every failure degrades to a fallback analysis instead
/// of an error, so one bad proposal never aborts a feed.
#[async_trait]
pub trait ImpactAnalyzer: Send + Sync {
    async fn analyze(&self, proposal: &ProposalMetadata, context: RequestMetadata) -> ImpactAnalysis;
}
