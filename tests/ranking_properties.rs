//! Property tests for feed ordering and impact-response parsing.

use proptest::prelude::*;

use dao_pulse::domain::updates::{
    parse_impact_response, sort_by_priority, ImpactParse, RiskLevel, UpdatePriority,
    ANALYSIS_FAILED_SUMMARY,
};

fn arbitrary_priority() -> impl Strategy<Value = UpdatePriority> {
    prop_oneof![
        Just(UpdatePriority::Urgent),
        Just(UpdatePriority::Important),
        Just(UpdatePriority::Fyi),
    ]
}

fn arbitrary_risk_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("low".to_string()),
        Just("Medium".to_string()),
        Just("HIGH".to_string()),
        "[a-z]{0,10}",
    ]
}

proptest! {
    #[test]
    fn prop_sort_orders_by_rank(priorities in prop::collection::vec(arbitrary_priority(), 0..50)) {
        let mut items: Vec<(UpdatePriority, usize)> =
            priorities.iter().copied().enumerate().map(|(i, p)| (p, i)).collect();

        sort_by_priority(&mut items, |(p, _)| *p);

        for pair in items.windows(2) {
            prop_assert!(pair[0].0.rank() <= pair[1].0.rank());
        }
    }

    #[test]
    fn prop_sort_is_stable(priorities in prop::collection::vec(arbitrary_priority(), 0..50)) {
        let mut items: Vec<(UpdatePriority, usize)> =
            priorities.iter().copied().enumerate().map(|(i, p)| (p, i)).collect();

        sort_by_priority(&mut items, |(p, _)| *p);

        for pair in items.windows(2) {
            if pair[0].0 == pair[1].0 {
                prop_assert!(
                    pair[0].1 < pair[1].1,
                    "equal priorities reordered: {:?}",
                    pair
                );
            }
        }
    }

    #[test]
    fn prop_sort_is_a_permutation(priorities in prop::collection::vec(arbitrary_priority(), 0..50)) {
        let mut items: Vec<(UpdatePriority, usize)> =
            priorities.iter().copied().enumerate().map(|(i, p)| (p, i)).collect();

        sort_by_priority(&mut items, |(p, _)| *p);

        let mut indices: Vec<usize> = items.iter().map(|(_, i)| *i).collect();
        indices.sort_unstable();
        prop_assert_eq!(indices, (0..priorities.len()).collect::<Vec<_>>());
    }

    #[test]
    fn prop_any_response_yields_usable_analysis(response in "(?s).{0,200}") {
        let analysis = parse_impact_response(&response).into_analysis();

        prop_assert!(!analysis.summary().is_empty());
        prop_assert!(!analysis.affected_areas().is_empty());
        prop_assert!(analysis.affected_areas().iter().all(|a| !a.is_empty()));
    }

    #[test]
    fn prop_short_responses_are_violations(line in "[^\n]{0,80}") {
        let parsed = parse_impact_response(&line);

        prop_assert!(parsed.is_violation());
        let analysis = parsed.into_analysis();
        prop_assert_eq!(analysis.summary(), ANALYSIS_FAILED_SUMMARY);
    }

    #[test]
    fn prop_labeled_responses_round_trip_fields(
        summary in "[A-Za-z][A-Za-z ]{0,40}[A-Za-z]",
        areas in prop::collection::vec("[A-Za-z][A-Za-z ]{0,15}[A-Za-z]", 1..5),
        risk in arbitrary_risk_text(),
    ) {
        let response = format!(
            "Summary: {}\nAreas: {}\nRisk: {}",
            summary,
            areas.join(", "),
            risk
        );

        let parsed = parse_impact_response(&response);
        let fields = match &parsed {
            ImpactParse::Parsed(fields) => fields.clone(),
            ImpactParse::FormatViolation { line_count } => {
                return Err(TestCaseError::fail(format!("violation with {line_count} lines")));
            }
        };
        prop_assert_eq!(&fields.summary, &summary);
        prop_assert_eq!(&fields.affected_areas, &areas);

        let expected_risk = match risk.to_lowercase().as_str() {
            "low" => RiskLevel::Low,
            "high" => RiskLevel::High,
            _ => RiskLevel::Medium,
        };
        prop_assert_eq!(parsed.into_analysis().risk_level(), expected_risk);
    }
}
