//! Updates module - Impact analyses and the feed records built from them.
//!
//! - `impact` - `ImpactAnalysis` value object and `RiskLevel`
//! - `update` - `DaoUpdate` record, priorities, categories and actions
//! - `parser` - Pure parser for the generation service's three-line format
//! - `prompt` - Prompt text for impact analysis
//! - `synthesizer` - Proposal + analysis to `DaoUpdate` mapping
//! - `ranking` - Stable priority ordering of a feed

mod impact;
mod parser;
mod prompt;
mod ranking;
mod synthesizer;
mod update;

pub use impact::{
    ImpactAnalysis, RiskLevel, ANALYSIS_FAILED_SUMMARY, EMPTY_SUMMARY_FALLBACK,
    NO_VALID_DATA_SUMMARY, UNKNOWN_AREA,
};
pub use parser::{parse_impact_response, ImpactParse, ParsedImpact};
pub use prompt::impact_prompt;
pub use ranking::{rank_updates, sort_by_priority};
pub use synthesizer::{proposal_url, synthesize_proposal_update, PROPOSAL_PAGE_BASE_URL};
pub use update::{
    DaoUpdate, NewDaoUpdate, UpdateAction, UpdateActionType, UpdateCategory, UpdatePriority,
    META_IMPACT_ANALYSIS, META_PROPOSAL_ID, META_VOTE_STATS,
};
