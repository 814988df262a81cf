//! Organization and proposal records plus GraphQL envelope decoding.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Title used when a proposal carries none.
pub const UNKNOWN_PROPOSAL_TITLE: &str = "Unknown Proposal";

/// Description used when a proposal carries none.
const MISSING_DESCRIPTION: &str = "No description available.";

/// A DAO as known to the data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// A governance proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub metadata: ProposalMetadata,
    /// Raw vote statistics, passed through untouched.
    #[serde(rename = "voteStats", default)]
    pub vote_stats: Option<Value>,
}

/// Human-authored proposal content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProposalMetadata {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }

    /// Title as sent to the analyzer; a missing title falls back to a placeholder.
    pub fn title_or_placeholder(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_PROPOSAL_TITLE)
    }

    /// Description as sent to the analyzer; a missing description falls back to a placeholder.
    pub fn description_or_placeholder(&self) -> &str {
        self.description.as_deref().unwrap_or(MISSING_DESCRIPTION)
    }

    /// Title for display: blank or missing titles read as "Unknown Proposal".
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => UNKNOWN_PROPOSAL_TITLE,
        }
    }
}

impl Proposal {
    /// Vote statistics, or an empty list when the provider sent none.
    pub fn vote_stats_or_empty(&self) -> Value {
        self.vote_stats
            .clone()
            .filter(|v| !v.is_null())
            .unwrap_or_else(|| Value::Array(Vec::new()))
    }
}

// ----- GraphQL envelopes -----

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct OrganizationData {
    organization: Option<Organization>,
}

#[derive(Debug, Deserialize)]
struct ProposalsData {
    proposals: Option<ProposalConnection>,
}

#[derive(Debug, Deserialize)]
struct ProposalConnection {
    #[serde(default)]
    nodes: Vec<Proposal>,
}

/// Extracts `data.organization` from a raw organization response.
///
/// Returns `Ok(None)` when `data` or `organization` is missing or null, and an
/// error when the organization object itself is malformed.
pub fn decode_organization(response: Value) -> Result<Option<Organization>, serde_json::Error> {
    let envelope: Envelope<OrganizationData> = serde_json::from_value(response)?;
    Ok(envelope.data.and_then(|d| d.organization))
}

/// Extracts `data.proposals.nodes` from a raw proposals response.
///
/// A missing `data` or `proposals` yields an empty list; a malformed node is
/// an error.
pub fn decode_proposals(response: Value) -> Result<Vec<Proposal>, serde_json::Error> {
    let envelope: Envelope<ProposalsData> = serde_json::from_value(response)?;
    Ok(envelope
        .data
        .and_then(|d| d.proposals)
        .map(|c| c.nodes)
        .unwrap_or_default())
}

/// Provider ids arrive as strings, but some endpoints emit bare numbers.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Text(s) => Ok(s),
        RawId::Number(n) => Ok(n.to_string()),
    }
}
