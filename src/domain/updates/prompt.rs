//! Prompt sent to the generation service for impact analysis.

/// Builds the impact-analysis prompt for a proposal.
///
/// The response format it requests is the one read by
/// [`parse_impact_response`](super::parse_impact_response).
pub fn impact_prompt(title: &str, description: &str) -> String {
    format!(
        r#"Analyze this governance proposal and determine its impact:
Proposal Title: {title}
Description: {description}

Provide:
1. A brief summary of potential impact
2. Key areas affected
3. Risk level (low/medium/high)

Respond with exactly three lines and nothing else, in this format:
Summary: [your summary]
Areas: [comma-separated list of affected areas]
Risk: [low/medium/high]
"#
    )
}
