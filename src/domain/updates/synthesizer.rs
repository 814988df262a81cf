//! Maps a proposal and its impact analysis into a feed update.

use serde_json::{Map, Value};

use super::impact::ImpactAnalysis;
use super::update::{
    DaoUpdate, NewDaoUpdate, UpdateAction, UpdateCategory, UpdatePriority, META_IMPACT_ANALYSIS,
    META_PROPOSAL_ID, META_VOTE_STATS,
};
use crate::domain::foundation::{Timestamp, ValidationError};
use crate::domain::governance::Proposal;

/// Base of the public proposal pages linked from updates.
pub const PROPOSAL_PAGE_BASE_URL: &str = "https://www.tally.xyz/gov";

/// Public page for a proposal.
pub fn proposal_url(dao_slug: &str, proposal_id: &str) -> String {
    format!("{}/{}/proposal/{}", PROPOSAL_PAGE_BASE_URL, dao_slug, proposal_id)
}

/// Builds the feed update for one analyzed proposal.
///
/// Pure: the caller supplies the timestamp. Fails when `dao_slug` is empty;
/// the impact analysis is stored under its own serialized shape.
pub fn synthesize_proposal_update(
    dao_slug: &str,
    dao_name: &str,
    proposal: &Proposal,
    impact: &ImpactAnalysis,
    timestamp: Timestamp,
) -> Result<DaoUpdate, ValidationError> {
    let mut metadata = Map::new();
    metadata.insert(META_PROPOSAL_ID.to_string(), Value::String(proposal.id.clone()));
    let impact_value = serde_json::to_value(impact)
        .map_err(|e| ValidationError::invalid_format(META_IMPACT_ANALYSIS, e.to_string()))?;
    metadata.insert(META_IMPACT_ANALYSIS.to_string(), impact_value);
    metadata.insert(META_VOTE_STATS.to_string(), proposal.vote_stats_or_empty());

    DaoUpdate::new(NewDaoUpdate {
        id: format!("prop_{}", proposal.id),
        dao_slug: dao_slug.to_string(),
        dao_name: dao_name.to_string(),
        title: format!("Proposal: {}", proposal.metadata.display_title()),
        description: impact.summary().to_string(),
        priority: UpdatePriority::for_proposal_risk(impact.risk_level()),
        category: UpdateCategory::Proposal,
        timestamp,
        metadata,
        actions: vec![UpdateAction::link(
            "View Proposal",
            proposal_url(dao_slug, &proposal.id),
        )],
    })
}
