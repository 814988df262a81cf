//! Parser for the three-line impact format returned by the generation service.
//!
//! Expected shape:
//!
//! ```text
//! Summary: <one sentence>
//! Areas: <comma-separated list>
//! Risk: <low|medium|high>
//! ```
//!
//! The service is untrusted free text, so parsing never fails hard: a
//! response with fewer than three lines is a [`ImpactParse::FormatViolation`],
//! and anything odd inside the three lines is normalized away.

use super::impact::{ImpactAnalysis, RiskLevel};

const SUMMARY_LABEL: &str = "Summary:";
const AREAS_LABEL: &str = "Areas:";
const RISK_LABEL: &str = "Risk:";

/// Fields extracted from a well-shaped response, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedImpact {
    pub summary: String,
    pub affected_areas: Vec<String>,
    /// Lowercased risk text; may be outside the known set.
    pub risk: String,
}

/// Outcome of parsing a generation-service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImpactParse {
    Parsed(ParsedImpact),
    FormatViolation { line_count: usize },
}

impl ImpactParse {
    /// Converts the parse outcome into an analysis, applying the default
    /// substitutions. A format violation becomes the generic failure analysis.
    pub fn into_analysis(self) -> ImpactAnalysis {
        match self {
            ImpactParse::Parsed(fields) => ImpactAnalysis::normalized(
                fields.summary,
                fields.affected_areas,
                fields.risk.parse::<RiskLevel>().ok(),
            ),
            ImpactParse::FormatViolation { .. } => ImpactAnalysis::analysis_failed(),
        }
    }

    pub fn is_violation(&self) -> bool {
        matches!(self, ImpactParse::FormatViolation { .. })
    }
}

/// Splits a response into lines and extracts summary, areas and risk.
///
/// Only the first three lines are read; trailing lines are ignored.
pub fn parse_impact_response(response: &str) -> ImpactParse {
    let lines: Vec<&str> = response.trim().split('\n').collect();
    if lines.len() < 3 {
        return ImpactParse::FormatViolation {
            line_count: lines.len(),
        };
    }

    let summary = lines[0].replace(SUMMARY_LABEL, "").trim().to_string();

    let affected_areas = lines[1]
        .replace(AREAS_LABEL, "")
        .split(',')
        .map(str::trim)
        .filter(|area| !area.is_empty())
        .map(str::to_string)
        .collect();

    let risk = lines[2].replace(RISK_LABEL, "").trim().to_lowercase();

    ImpactParse::Parsed(ParsedImpact {
        summary,
        affected_areas,
        risk,
    })
}
