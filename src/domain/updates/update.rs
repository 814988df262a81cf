//! DaoUpdate record and its enumerated fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::impact::{ImpactAnalysis, RiskLevel};
use crate::domain::foundation::{Timestamp, ValidationError};

/// Metadata key holding the source proposal id.
pub const META_PROPOSAL_ID: &str = "proposal_id";
/// Metadata key holding the serialized impact analysis.
pub const META_IMPACT_ANALYSIS: &str = "impact_analysis";
/// Metadata key holding raw vote statistics.
pub const META_VOTE_STATS: &str = "vote_stats";

/// How prominently an update should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdatePriority {
    Urgent,
    Important,
    Fyi,
}

impl UpdatePriority {
    const NAMES: [&'static str; 3] = ["urgent", "important", "fyi"];

    /// Sort rank; lower ranks come first in a feed.
    pub fn rank(&self) -> u8 {
        match self {
            UpdatePriority::Urgent => 0,
            UpdatePriority::Important => 1,
            UpdatePriority::Fyi => 2,
        }
    }

    /// Priority of a proposal update with the given risk.
    ///
    /// Only high risk is urgent; proposal updates are never `Fyi`.
    pub fn for_proposal_risk(risk: RiskLevel) -> Self {
        match risk {
            RiskLevel::High => UpdatePriority::Urgent,
            RiskLevel::Medium | RiskLevel::Low => UpdatePriority::Important,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdatePriority::Urgent => "urgent",
            UpdatePriority::Important => "important",
            UpdatePriority::Fyi => "fyi",
        }
    }
}

impl fmt::Display for UpdatePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UpdatePriority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "urgent" => Ok(UpdatePriority::Urgent),
            "important" => Ok(UpdatePriority::Important),
            "fyi" => Ok(UpdatePriority::Fyi),
            other => Err(ValidationError::not_in_set("priority", &Self::NAMES, other)),
        }
    }
}

/// What kind of governance activity an update describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateCategory {
    Proposal,
    Treasury,
    Governance,
    Social,
}

impl UpdateCategory {
    const NAMES: [&'static str; 4] = ["proposal", "treasury", "governance", "social"];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateCategory::Proposal => "proposal",
            UpdateCategory::Treasury => "treasury",
            UpdateCategory::Governance => "governance",
            UpdateCategory::Social => "social",
        }
    }
}

impl fmt::Display for UpdateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UpdateCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proposal" => Ok(UpdateCategory::Proposal),
            "treasury" => Ok(UpdateCategory::Treasury),
            "governance" => Ok(UpdateCategory::Governance),
            "social" => Ok(UpdateCategory::Social),
            other => Err(ValidationError::not_in_set("category", &Self::NAMES, other)),
        }
    }
}

/// Kind of call-to-action attached to an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateActionType {
    Link,
    Vote,
    Delegate,
}

impl UpdateActionType {
    const NAMES: [&'static str; 3] = ["link", "vote", "delegate"];
}

impl FromStr for UpdateActionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "link" => Ok(UpdateActionType::Link),
            "vote" => Ok(UpdateActionType::Vote),
            "delegate" => Ok(UpdateActionType::Delegate),
            other => Err(ValidationError::not_in_set("type", &Self::NAMES, other)),
        }
    }
}

/// A call-to-action embedded in an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAction {
    #[serde(rename = "type")]
    pub action_type: UpdateActionType,
    pub label: String,
    pub url: String,
}

impl UpdateAction {
    pub fn new(action_type: UpdateActionType, label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            action_type,
            label: label.into(),
            url: url.into(),
        }
    }

    /// Creates a plain link action.
    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(UpdateActionType::Link, label, url)
    }
}

/// Field values for constructing a [`DaoUpdate`].
#[derive(Debug, Clone)]
pub struct NewDaoUpdate {
    pub id: String,
    pub dao_slug: String,
    pub dao_name: String,
    pub title: String,
    pub description: String,
    pub priority: UpdatePriority,
    pub category: UpdateCategory,
    pub timestamp: Timestamp,
    pub metadata: Map<String, Value>,
    pub actions: Vec<UpdateAction>,
}

/// A single user-facing entry in a DAO's update feed.
///
/// Immutable once constructed. Serializes to the JSON shape consumed by the
/// feed UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDaoUpdate")]
pub struct DaoUpdate {
    id: String,
    dao_slug: String,
    dao_name: String,
    title: String,
    description: String,
    priority: UpdatePriority,
    category: UpdateCategory,
    timestamp: Timestamp,
    metadata: Map<String, Value>,
    actions: Vec<UpdateAction>,
}

#[derive(Deserialize)]
struct RawDaoUpdate {
    id: String,
    dao_slug: String,
    dao_name: String,
    title: String,
    description: String,
    priority: UpdatePriority,
    category: UpdateCategory,
    timestamp: Timestamp,
    #[serde(default)]
    metadata: Map<String, Value>,
    #[serde(default)]
    actions: Option<Vec<UpdateAction>>,
}

impl TryFrom<RawDaoUpdate> for DaoUpdate {
    type Error = ValidationError;

    fn try_from(raw: RawDaoUpdate) -> Result<Self, Self::Error> {
        DaoUpdate::new(NewDaoUpdate {
            id: raw.id,
            dao_slug: raw.dao_slug,
            dao_name: raw.dao_name,
            title: raw.title,
            description: raw.description,
            priority: raw.priority,
            category: raw.category,
            timestamp: raw.timestamp,
            metadata: raw.metadata,
            actions: raw.actions.unwrap_or_default(),
        })
    }
}

impl DaoUpdate {
    /// Creates an update, rejecting an empty id or DAO slug.
    pub fn new(fields: NewDaoUpdate) -> Result<Self, ValidationError> {
        if fields.id.trim().is_empty() {
            return Err(ValidationError::empty_field("id"));
        }
        if fields.dao_slug.trim().is_empty() {
            return Err(ValidationError::empty_field("dao_slug"));
        }

        Ok(Self {
            id: fields.id,
            dao_slug: fields.dao_slug,
            dao_name: fields.dao_name,
            title: fields.title,
            description: fields.description,
            priority: fields.priority,
            category: fields.category,
            timestamp: fields.timestamp,
            metadata: fields.metadata,
            actions: fields.actions,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dao_slug(&self) -> &str {
        &self.dao_slug
    }

    pub fn dao_name(&self) -> &str {
        &self.dao_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> UpdatePriority {
        self.priority
    }

    pub fn category(&self) -> UpdateCategory {
        self.category
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn actions(&self) -> &[UpdateAction] {
        &self.actions
    }

    /// Source proposal id, if this update was built from a proposal.
    pub fn proposal_id(&self) -> Option<&str> {
        self.metadata.get(META_PROPOSAL_ID).and_then(Value::as_str)
    }

    /// Decodes the impact analysis stored in metadata.
    pub fn impact_analysis(&self) -> Option<ImpactAnalysis> {
        self.metadata
            .get(META_IMPACT_ANALYSIS)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }
}
