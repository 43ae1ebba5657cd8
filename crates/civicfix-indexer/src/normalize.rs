//! Label acceptance rules for classifier output.

use std::collections::HashSet;

use tracing::{debug, warn};

use civicfix_core::config::IndexingConfig;
use civicfix_core::constants::{default_predicted_fix, is_canonical_label, normalize_label};
use civicfix_core::errors::ValidationError;
use civicfix_core::models::{CandidateLabel, DetectedIssueLabel};

const MAX_SEVERITY: f64 = 10.0;

/// Accept, normalize and bound the classifier's candidate labels.
///
/// In order: names are normalized; a confidence outside [0, 1] rejects the
/// whole payload; labels below `min_confidence` are dropped; duplicates
/// collapse to their first occurrence; survivors are ordered by severity
/// (highest first, ties keep classifier order) and capped at `max_labels`.
/// An empty result is a valid outcome, not an error.
pub fn normalize_labels(
    candidates: &[CandidateLabel],
    config: &IndexingConfig,
) -> Result<Vec<DetectedIssueLabel>, ValidationError> {
    let mut seen = HashSet::new();
    let mut accepted = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let label_type = normalize_label(&candidate.label_type);
        if label_type.is_empty() {
            debug!("skipping candidate label with empty type");
            continue;
        }
        let confidence = candidate.confidence;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ValidationError::ConfidenceOutOfRange {
                label: label_type,
                value: confidence,
            });
        }
        if confidence < config.min_confidence {
            debug!(label = %label_type, confidence, "dropping low-confidence label");
            continue;
        }
        if !seen.insert(label_type.clone()) {
            debug!(label = %label_type, "dropping duplicate label");
            continue;
        }
        if !is_canonical_label(&label_type) {
            warn!(label = %label_type, "classifier returned a label outside the canonical vocabulary");
        }
        accepted.push(accept(candidate, label_type, config));
    }

    // Stable: equal severities keep classifier order.
    accepted.sort_by(|a, b| b.severity_score.total_cmp(&a.severity_score));
    if accepted.len() > config.max_labels {
        debug!(
            survivors = accepted.len(),
            max_labels = config.max_labels,
            "capping labels by severity"
        );
        accepted.truncate(config.max_labels);
    }
    Ok(accepted)
}

fn accept(candidate: &CandidateLabel, label_type: String, config: &IndexingConfig) -> DetectedIssueLabel {
    let predicted_fix = match candidate.predicted_fix.trim() {
        "" => default_predicted_fix(&label_type)
            .unwrap_or_default()
            .to_string(),
        fix => fix.to_string(),
    };
    DetectedIssueLabel {
        auto_review_flag: candidate.confidence < config.review_threshold,
        confidence: candidate.confidence,
        severity_score: clamp_unit(candidate.severity_score, MAX_SEVERITY),
        future_impact: candidate.future_impact.trim().to_string(),
        predicted_fix,
        predicted_fix_confidence: clamp_unit(candidate.predicted_fix_confidence, 1.0),
        label_type,
    }
}

/// Clamp into [0, max]; non-finite values become 0.
fn clamp_unit(value: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(label_type: &str, confidence: f64, severity: f64) -> CandidateLabel {
        CandidateLabel {
            label_type: label_type.to_string(),
            confidence,
            severity_score: severity,
            future_impact: String::new(),
            predicted_fix: String::new(),
            predicted_fix_confidence: 0.5,
        }
    }

    #[test]
    fn duplicates_collapse_to_first_occurrence() {
        let labels = normalize_labels(
            &[
                candidate("Sewer Blockage", 0.7, 4.0),
                candidate("sewer_blockage", 0.95, 9.0),
            ],
            &IndexingConfig::default(),
        )
        .unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].label_type, "sewer_blockage");
        assert_eq!(labels[0].confidence, 0.7);
        assert!(labels[0].auto_review_flag);
    }

    #[test]
    fn missing_predicted_fix_uses_vocabulary_default() {
        let labels =
            normalize_labels(&[candidate("streetlight out", 0.9, 3.0)], &IndexingConfig::default())
                .unwrap();
        assert_eq!(labels[0].predicted_fix, "Replace lamp and driver; repair wiring.");

        let unknown =
            normalize_labels(&[candidate("fallen tree", 0.9, 3.0)], &IndexingConfig::default())
                .unwrap();
        assert_eq!(unknown[0].label_type, "fallen_tree");
        assert_eq!(unknown[0].predicted_fix, "");
    }

    #[test]
    fn out_of_range_confidence_rejects_payload() {
        for bad in [1.2, -0.1, f64::NAN] {
            let result =
                normalize_labels(&[candidate("waterlogging", bad, 5.0)], &IndexingConfig::default());
            assert!(matches!(result, Err(ValidationError::ConfidenceOutOfRange { .. })));
        }
    }

    #[test]
    fn severity_is_clamped() {
        let labels = normalize_labels(
            &[
                candidate("waterlogging", 0.9, 14.0),
                candidate("sewer_blockage", 0.9, f64::NAN),
            ],
            &IndexingConfig::default(),
        )
        .unwrap();
        assert_eq!(labels[0].severity_score, 10.0);
        assert_eq!(labels[1].severity_score, 0.0);
    }

    #[test]
    fn blank_types_are_skipped() {
        let labels =
            normalize_labels(&[candidate("  ", 0.9, 5.0)], &IndexingConfig::default()).unwrap();
        assert!(labels.is_empty());
    }
}
