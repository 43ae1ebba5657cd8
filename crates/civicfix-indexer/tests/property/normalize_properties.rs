use std::collections::HashSet;

use proptest::prelude::*;

use civicfix_core::config::IndexingConfig;
use civicfix_core::models::CandidateLabel;
use civicfix_indexer::normalize_labels;

const TYPES: &[&str] = &[
    "waterlogging",
    "Sewer Blockage",
    "sewer_blockage",
    "streetlight_out",
    "visible pollution",
    "broken_infrastructure",
    "illegal_hoarding",
];

fn candidate() -> impl Strategy<Value = CandidateLabel> {
    (0..TYPES.len(), 0.0f64..=1.0, 0.0f64..=10.0).prop_map(|(t, confidence, severity)| {
        CandidateLabel {
            label_type: TYPES[t].to_string(),
            confidence,
            severity_score: severity,
            future_impact: String::new(),
            predicted_fix: String::new(),
            predicted_fix_confidence: 0.0,
        }
    })
}

proptest! {
    #[test]
    fn survivors_are_bounded_unique_and_confident(
        candidates in prop::collection::vec(candidate(), 0..12),
        max_labels in 1usize..6,
    ) {
        let config = IndexingConfig { max_labels, ..IndexingConfig::default() };
        let labels = normalize_labels(&candidates, &config).unwrap();

        prop_assert!(labels.len() <= max_labels);
        let unique: HashSet<&str> = labels.iter().map(|l| l.label_type.as_str()).collect();
        prop_assert_eq!(unique.len(), labels.len());
        for label in &labels {
            prop_assert!(label.confidence >= config.min_confidence);
            prop_assert_eq!(label.auto_review_flag, label.confidence < config.review_threshold);
            prop_assert!(!label.label_type.contains(' '));
        }
        for pair in labels.windows(2) {
            prop_assert!(pair[0].severity_score >= pair[1].severity_score);
        }
    }

    #[test]
    fn normalization_is_deterministic(candidates in prop::collection::vec(candidate(), 0..12)) {
        let config = IndexingConfig::default();
        prop_assert_eq!(
            normalize_labels(&candidates, &config).unwrap(),
            normalize_labels(&candidates, &config).unwrap()
        );
    }
}
