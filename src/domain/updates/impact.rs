//! ImpactAnalysis value object and its risk level.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Area reported when nothing more specific is known.
pub const UNKNOWN_AREA: &str = "Unknown";

pub const NO_VALID_DATA_SUMMARY: &str = "No valid proposal data available";
pub const ANALYSIS_FAILED_SUMMARY: &str = "Error analyzing proposal";
pub const EMPTY_SUMMARY_FALLBACK: &str = "Could not analyze impact";

/// Estimated risk of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    const NAMES: [&'static str; 3] = ["low", "medium", "high"];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(ValidationError::not_in_set("risk_level", &Self::NAMES, other)),
        }
    }
}

/// Structured assessment of what a proposal changes and how risky it is.
///
/// Always carries at least one affected area. A missing risk level in
/// serialized input reads as `medium`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawImpactAnalysis")]
pub struct ImpactAnalysis {
    summary: String,
    affected_areas: Vec<String>,
    risk_level: RiskLevel,
}

#[derive(Deserialize)]
struct RawImpactAnalysis {
    summary: String,
    affected_areas: Vec<String>,
    #[serde(default)]
    risk_level: Option<RiskLevel>,
}

impl TryFrom<RawImpactAnalysis> for ImpactAnalysis {
    type Error = ValidationError;

    fn try_from(raw: RawImpactAnalysis) -> Result<Self, Self::Error> {
        Self::new(raw.summary, raw.affected_areas, raw.risk_level.unwrap_or_default())
    }
}

impl ImpactAnalysis {
    /// Creates an analysis, rejecting an empty area list.
    pub fn new(
        summary: impl Into<String>,
        affected_areas: Vec<String>,
        risk_level: RiskLevel,
    ) -> Result<Self, ValidationError> {
        if affected_areas.is_empty() {
            return Err(ValidationError::empty_field("affected_areas"));
        }
        Ok(Self {
            summary: summary.into(),
            affected_areas,
            risk_level,
        })
    }

    /// Builds an analysis from loosely parsed fields, substituting defaults
    /// for an empty summary, an empty area list, or an unknown risk level.
    pub fn normalized(
        summary: impl Into<String>,
        affected_areas: Vec<String>,
        risk_level: Option<RiskLevel>,
    ) -> Self {
        let summary = summary.into();
        let summary = if summary.is_empty() {
            EMPTY_SUMMARY_FALLBACK.to_string()
        } else {
            summary
        };
        let affected_areas = if affected_areas.is_empty() {
            vec![UNKNOWN_AREA.to_string()]
        } else {
            affected_areas
        };

        Self {
            summary,
            affected_areas,
            risk_level: risk_level.unwrap_or_default(),
        }
    }

    /// Analysis for a proposal whose title or description is blank.
    pub fn no_valid_data() -> Self {
        Self::fallback(NO_VALID_DATA_SUMMARY)
    }

    /// Analysis used whenever generation or parsing fails.
    pub fn analysis_failed() -> Self {
        Self::fallback(ANALYSIS_FAILED_SUMMARY)
    }

    fn fallback(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            affected_areas: vec![UNKNOWN_AREA.to_string()],
            risk_level: RiskLevel::Medium,
        }
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn affected_areas(&self) -> &[String] {
        &self.affected_areas
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Returns true if this is one of the fixed fallback analyses.
    pub fn is_fallback(&self) -> bool {
        (self.summary == NO_VALID_DATA_SUMMARY || self.summary == ANALYSIS_FAILED_SUMMARY)
            && self.affected_areas == [UNKNOWN_AREA]
            && self.risk_level == RiskLevel::Medium
    }
}
