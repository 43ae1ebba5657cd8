use proptest::prelude::*;

use civicfix_core::models::{FixedState, OverallOutcome, PerIssueResult};
use civicfix_verification::{label_outcomes, reconcile, unresolved_labels, IssueStatusUpdate};
use test_fixtures::builders::{city_center, issue_at, reference_now};

const LABELS: &[&str] = &[
    "waterlogging",
    "sewer_blockage",
    "streetlight_out",
    "overflowing_garbage_bin",
];

fn state() -> impl Strategy<Value = Option<FixedState>> {
    prop_oneof![
        Just(None),
        Just(Some(FixedState::Yes)),
        Just(Some(FixedState::Partial)),
        Just(Some(FixedState::No)),
    ]
}

fn result(issue_type: &str, fixed: FixedState) -> PerIssueResult {
    PerIssueResult {
        issue_type: issue_type.to_string(),
        original_confidence: None,
        fixed,
        confidence: 0.8,
        evidence_photos: vec![],
        notes: String::new(),
    }
}

proptest! {
    #[test]
    fn closes_only_when_every_label_is_fully_fixed(
        label_count in 1usize..=4,
        states in prop::collection::vec(state(), 4),
        reversed in any::<bool>(),
    ) {
        let labels: Vec<(&str, f64)> = LABELS[..label_count].iter().map(|l| (*l, 5.0)).collect();
        let issue = issue_at("i-1", city_center(), reference_now(), &labels);
        let mut results: Vec<PerIssueResult> = LABELS[..label_count]
            .iter()
            .zip(&states)
            .filter_map(|(label, state)| state.map(|s| result(label, s)))
            .collect();
        if reversed {
            results.reverse();
        }

        let all_fixed = states[..label_count].iter().all(|s| *s == Some(FixedState::Yes));
        let (outcome, update) = reconcile(&issue, &results);
        prop_assert_eq!(outcome == OverallOutcome::Closed, all_fixed);
        prop_assert_eq!(update == IssueStatusUpdate::Close, all_fixed);
        prop_assert_eq!(unresolved_labels(&issue, &results).is_empty(), all_fixed);

        let outcomes = label_outcomes(&issue, &results);
        prop_assert_eq!(outcomes.len(), label_count);
        for (outcome, label) in outcomes.iter().zip(LABELS) {
            prop_assert_eq!(outcome.issue_type.as_str(), *label);
        }
    }

    #[test]
    fn reconciliation_is_deterministic(states in prop::collection::vec(state(), 4)) {
        let labels: Vec<(&str, f64)> = LABELS.iter().map(|l| (*l, 5.0)).collect();
        let issue = issue_at("i-1", city_center(), reference_now(), &labels);
        let results: Vec<PerIssueResult> = LABELS
            .iter()
            .zip(&states)
            .filter_map(|(label, state)| state.map(|s| result(label, s)))
            .collect();
        prop_assert_eq!(reconcile(&issue, &results), reconcile(&issue, &results));
    }
}
